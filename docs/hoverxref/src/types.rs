//! Core types for hoverxref
//!
//! - [`Node`] - the slice of a doctree element the interceptors read and write
//! - [`PendingXref`] - a reference produced by a role, waiting for resolution
//! - [`HoverMetadata`] - the data a tooltip needs to fetch a preview
//! - [`LabelLocation`] / [`ObjectLocation`] - entries of the host's inventory

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Attribute map for an emitted tag. Ordered so output is stable.
pub type Attributes = BTreeMap<String, String>;

/// Identity of a doctree node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A doctree element as seen by the interceptors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub id: NodeId,
    /// Style classes, emitted first in the `class` attribute
    pub classes: Vec<String>,
    /// Identifiers; the first one becomes the `id` attribute
    pub ids: Vec<String>,
    /// Remaining element attributes (`refuri`, ...)
    pub attributes: Attributes,
}

impl Node {
    pub fn new(id: NodeId) -> Self {
        Self {
            id,
            classes: Vec::new(),
            ids: Vec::new(),
            attributes: Attributes::new(),
        }
    }

    pub fn with_classes<I, S>(mut self, classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.classes = classes.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_ids<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ids = ids.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Overwrite the style classes.
    pub fn replace_classes<I, S>(&mut self, classes: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.classes = classes.into_iter().map(Into::into).collect();
    }

    /// Overwrite the identifier set.
    pub fn replace_ids<I, S>(&mut self, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ids = ids.into_iter().map(Into::into).collect();
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }
}

/// A cross-reference created by a role and not yet resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingXref {
    /// Node identity the resolved link will keep
    pub id: NodeId,
    /// Domain the role belongs to (`std`)
    pub domain: String,
    /// Role name (`hoverxref`, `ref`, `confval`, ...)
    pub reftype: String,
    /// Normalized target name
    pub target: String,
    /// Whether the author gave an explicit title
    pub explicit: bool,
    /// Document the reference appears in
    pub refdoc: String,
    /// Link text
    pub title: String,
}

/// Location of a section label in the host inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelLocation {
    pub docname: String,
    pub labelid: String,
    /// Section title; empty for anonymous labels
    #[serde(default)]
    pub sectname: String,
}

impl LabelLocation {
    pub fn new(docname: impl Into<String>, labelid: impl Into<String>) -> Self {
        Self {
            docname: docname.into(),
            labelid: labelid.into(),
            sectname: String::new(),
        }
    }

    pub fn with_sectname(mut self, sectname: impl Into<String>) -> Self {
        self.sectname = sectname.into();
        self
    }
}

/// Location of a registered object in the host inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectLocation {
    pub docname: String,
    pub labelid: String,
}

impl ObjectLocation {
    pub fn new(docname: impl Into<String>, labelid: impl Into<String>) -> Self {
        Self {
            docname: docname.into(),
            labelid: labelid.into(),
        }
    }
}

/// Data needed to fetch a preview of a reference target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoverMetadata {
    pub project: String,
    pub version: String,
    /// Document containing the target
    pub doc: String,
    /// Anchor id of the target
    pub section: String,
}

impl HoverMetadata {
    pub const PROJECT: &'static str = "data-project";
    pub const VERSION: &'static str = "data-version";
    pub const DOC: &'static str = "data-doc";
    pub const SECTION: &'static str = "data-section";

    /// The metadata as HTML attribute pairs.
    pub fn attributes(&self) -> [(&'static str, &str); 4] {
        [
            (Self::PROJECT, self.project.as_str()),
            (Self::VERSION, self.version.as_str()),
            (Self::DOC, self.doc.as_str()),
            (Self::SECTION, self.section.as_str()),
        ]
    }
}

impl fmt::Display for HoverMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{'{}': '{}', '{}': '{}', '{}': '{}', '{}': '{}'}}",
            Self::PROJECT,
            self.project,
            Self::VERSION,
            self.version,
            Self::DOC,
            self.doc,
            Self::SECTION,
            self.section
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_builders() {
        let node = Node::new(NodeId(3))
            .with_classes(["reference", "internal"])
            .with_ids(["intro"])
            .with_attribute("refuri", "intro.html");
        assert_eq!(node.classes, vec!["reference", "internal"]);
        assert_eq!(node.ids, vec!["intro"]);
        assert_eq!(node.attribute("refuri"), Some("intro.html"));
        assert_eq!(node.attribute("missing"), None);
    }

    #[test]
    fn test_replace_classes() {
        let mut node = Node::new(NodeId(1)).with_classes(["a", "b"]);
        node.replace_classes(["hoverxref"]);
        assert_eq!(node.classes, vec!["hoverxref"]);
    }

    #[test]
    fn test_replace_ids_with_empty() {
        let mut node = Node::new(NodeId(1)).with_ids(["x"]);
        node.replace_ids(Vec::<String>::new());
        assert!(node.ids.is_empty());
    }

    #[test]
    fn test_metadata_attributes() {
        let meta = HoverMetadata {
            project: "myproject".to_string(),
            version: "latest".to_string(),
            doc: "chapter-i".to_string(),
            section: "section-i".to_string(),
        };
        let attrs = meta.attributes();
        assert_eq!(attrs[0], ("data-project", "myproject"));
        assert_eq!(attrs[3], ("data-section", "section-i"));
    }

    #[test]
    fn test_metadata_display() {
        let meta = HoverMetadata {
            project: "p".to_string(),
            version: "v".to_string(),
            doc: "d".to_string(),
            section: "s".to_string(),
        };
        assert_eq!(
            meta.to_string(),
            "{'data-project': 'p', 'data-version': 'v', 'data-doc': 'd', 'data-section': 's'}"
        );
    }

    #[test]
    fn test_label_location_sectname_default() {
        let json = r#"{"docname": "index", "labelid": "intro"}"#;
        let label: LabelLocation = serde_json::from_str(json).unwrap();
        assert_eq!(label, LabelLocation::new("index", "intro"));
    }

    #[test]
    fn test_node_id_display() {
        assert_eq!(NodeId(42).to_string(), "#42");
    }
}
