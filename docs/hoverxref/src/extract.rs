//! Identifier extraction: which document and anchor a reference points to.

use crate::host::ObjectInventory;
use crate::types::{LabelLocation, ObjectLocation, PendingXref};

/// Document and anchor for a label reference.
///
/// Reads the host's final label table, so ids deduplicated by automatic
/// section labelling come back already disambiguated.
pub fn ref_xref_data<I>(inventory: &I, xref: &PendingXref) -> Option<LabelLocation>
where
    I: ObjectInventory + ?Sized,
{
    inventory
        .label(&xref.target, xref.explicit)
        .filter(|label| !label.docname.is_empty())
}

/// Document and anchor for a typed object reference.
pub fn obj_xref_data<I>(inventory: &I, objtype: &str, target: &str) -> Option<ObjectLocation>
where
    I: ObjectInventory + ?Sized,
{
    inventory.object(objtype, target)
}
