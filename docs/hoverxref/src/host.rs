//! Interfaces to the host documentation generator.
//!
//! The extension never resolves references or writes HTML on its own; it
//! wraps the host's entry points. [`StandardDomain`] and [`DocutilsEmitter`]
//! are small in-memory stand-ins for those entry points, used by the CLI and
//! the tests.

use std::collections::BTreeMap;

use crate::types::{Attributes, LabelLocation, Node, ObjectLocation, PendingXref};

/// Lookups into the host's label and object tables.
pub trait ObjectInventory {
    /// Label for a `:ref:`-style target. Explicit-title references look in
    /// the anonymous label table, implicit ones in the named label table.
    fn label(&self, target: &str, explicit: bool) -> Option<LabelLocation>;

    /// Registered object keyed by (object type, target name).
    fn object(&self, objtype: &str, target: &str) -> Option<ObjectLocation>;
}

/// The host's default reference resolution.
pub trait ReferenceResolver {
    /// Resolve a label reference. `None` means unresolved.
    fn resolve_ref_xref(&self, fromdocname: &str, xref: &PendingXref) -> Option<Node>;

    /// Resolve a reference to a typed object. `None` means unresolved.
    fn resolve_obj_xref(&self, fromdocname: &str, objtype: &str, xref: &PendingXref)
        -> Option<Node>;
}

/// The host's default HTML start-tag emission.
pub trait TagEmitter {
    fn starttag(
        &self,
        node: &Node,
        tagname: &str,
        attributes: Attributes,
        suffix: &str,
        empty: bool,
    ) -> String;
}

/// In-memory standard domain: labels and objects collected while reading.
#[derive(Debug, Clone, Default)]
pub struct StandardDomain {
    labels: BTreeMap<String, LabelLocation>,
    anonlabels: BTreeMap<String, LabelLocation>,
    objects: BTreeMap<(String, String), ObjectLocation>,
}

impl StandardDomain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a label placed before a section. Named labels are also
    /// reachable as anonymous labels.
    pub fn add_label(&mut self, name: &str, docname: &str, labelid: &str, sectname: &str) {
        let location = LabelLocation::new(docname, labelid).with_sectname(sectname);
        self.anonlabels
            .insert(name.to_string(), LabelLocation::new(docname, labelid));
        self.labels.insert(name.to_string(), location);
    }

    /// Register a label that can only be referenced with an explicit title.
    pub fn add_anonlabel(&mut self, name: &str, docname: &str, labelid: &str) {
        self.anonlabels
            .insert(name.to_string(), LabelLocation::new(docname, labelid));
    }

    pub fn add_object(&mut self, objtype: &str, name: &str, docname: &str, labelid: &str) {
        self.objects.insert(
            (objtype.to_string(), name.to_string()),
            ObjectLocation::new(docname, labelid),
        );
    }

    fn make_refnode(
        &self,
        fromdocname: &str,
        xref: &PendingXref,
        docname: &str,
        labelid: &str,
        caption: &str,
    ) -> Node {
        let href = if fromdocname == docname {
            format!("#{}", labelid)
        } else {
            format!("{}#{}", relative_uri(fromdocname, docname), labelid)
        };
        Node::new(xref.id)
            .with_attribute("refuri", href)
            .with_attribute("internal", "True")
            .with_attribute("caption", caption)
    }
}

impl ObjectInventory for StandardDomain {
    fn label(&self, target: &str, explicit: bool) -> Option<LabelLocation> {
        let table = if explicit { &self.anonlabels } else { &self.labels };
        table.get(target).cloned()
    }

    fn object(&self, objtype: &str, target: &str) -> Option<ObjectLocation> {
        self.objects
            .get(&(objtype.to_string(), target.to_string()))
            .cloned()
    }
}

impl ReferenceResolver for StandardDomain {
    fn resolve_ref_xref(&self, fromdocname: &str, xref: &PendingXref) -> Option<Node> {
        let label = self.label(&xref.target, xref.explicit)?;
        if label.docname.is_empty() {
            return None;
        }
        // Implicit references take the section title as link text
        let caption = if xref.explicit || label.sectname.is_empty() {
            &xref.title
        } else {
            &label.sectname
        };
        Some(self.make_refnode(fromdocname, xref, &label.docname, &label.labelid, caption))
    }

    fn resolve_obj_xref(&self, fromdocname: &str, objtype: &str, xref: &PendingXref) -> Option<Node> {
        let object = self.object(objtype, &xref.target)?;
        Some(self.make_refnode(fromdocname, xref, &object.docname, &object.labelid, &xref.title))
    }
}

/// URI of `to` relative to `from`, both given as document names.
pub fn relative_uri(from: &str, to: &str) -> String {
    let mut base: Vec<&str> = from.split('/').collect();
    let mut target: Vec<&str> = to.split('/').collect();

    while base.len() > 1 && target.len() > 1 && base[0] == target[0] {
        base.remove(0);
        target.remove(0);
    }

    format!("{}{}.html", "../".repeat(base.len() - 1), target.join("/"))
}

/// Docutils-style start tags: classes joined, first id as `id`, extra ids as
/// empty spans, attributes sorted by name.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocutilsEmitter;

impl DocutilsEmitter {
    /// Attributes the HTML writer passes when visiting a reference node.
    pub fn reference_attributes(node: &Node) -> Attributes {
        let mut atts = Attributes::new();
        let kind = if node.attribute("internal").is_some() {
            "reference internal"
        } else {
            "reference external"
        };
        atts.insert("class".to_string(), kind.to_string());
        if let Some(uri) = node.attribute("refuri") {
            atts.insert("href".to_string(), uri.to_string());
        }
        atts
    }
}

impl TagEmitter for DocutilsEmitter {
    fn starttag(
        &self,
        node: &Node,
        tagname: &str,
        attributes: Attributes,
        suffix: &str,
        empty: bool,
    ) -> String {
        let mut atts: Attributes = attributes
            .into_iter()
            .map(|(k, v)| (k.to_lowercase(), v))
            .collect();

        let extra_classes = atts.remove("class").unwrap_or_default();
        let classes: Vec<&str> = node
            .classes
            .iter()
            .map(String::as_str)
            .chain(extra_classes.split_whitespace())
            .collect();
        if !classes.is_empty() {
            atts.insert("class".to_string(), classes.join(" "));
        }

        let mut prefix = String::new();
        if let Some((first, rest)) = node.ids.split_first() {
            atts.insert("id".to_string(), first.clone());
            for id in rest {
                prefix.push_str(&format!("<span id=\"{}\"></span>", escape_html(id)));
            }
        }

        let mut parts = vec![tagname.to_lowercase()];
        for (name, value) in &atts {
            parts.push(format!("{}=\"{}\"", name, escape_html(value)));
        }

        let infix = if empty { " /" } else { "" };
        format!("{}<{}{}>{}", prefix, parts.join(" "), infix, suffix)
    }
}

/// Escape HTML special characters
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
