//! Render interceptor.
//!
//! Sits in front of the host's start-tag emission. Anchor tags pick up the
//! hover data stashed by the resolver; definition terms that repeat their
//! parent's ids are emitted without them. Every other tag is passed through.

use crate::host::{DocutilsEmitter, TagEmitter};
use crate::resolver::HoverTable;
use crate::types::{Attributes, Node};

/// Start-tag emission with hover attributes.
#[derive(Debug)]
pub struct HoverTranslator<'a, E> {
    emitter: E,
    table: &'a mut HoverTable,
}

impl<'a, E: TagEmitter> HoverTranslator<'a, E> {
    pub fn new(emitter: E, table: &'a mut HoverTable) -> Self {
        Self { emitter, table }
    }

    /// Emit a start tag for `node`. `parent` is the enclosing element, when
    /// there is one.
    pub fn starttag(
        &mut self,
        node: &Node,
        parent: Option<&Node>,
        tagname: &str,
        mut attributes: Attributes,
        suffix: &str,
        empty: bool,
    ) -> String {
        match tagname.to_ascii_lowercase().as_str() {
            "a" => {
                if let Some(metadata) = self.table.take(node.id) {
                    for (name, value) in metadata.attributes() {
                        attributes.insert(name.to_string(), value.to_string());
                    }
                    tracing::info!(node = %node.id, "hover attributes: {:?}", attributes);
                }
                self.emitter.starttag(node, tagname, attributes, suffix, empty)
            }
            "dt" if parent.is_some_and(|p| same_ids(&p.ids, &node.ids)) => {
                // The parent already carries these ids
                let mut node = node.clone();
                node.replace_ids(Vec::<String>::new());
                self.emitter.starttag(&node, tagname, attributes, suffix, empty)
            }
            _ => self.emitter.starttag(node, tagname, attributes, suffix, empty),
        }
    }

    /// Emit the opening `<a>` for a resolved reference node.
    pub fn visit_reference(&mut self, node: &Node) -> String {
        let attributes = DocutilsEmitter::reference_attributes(node);
        self.starttag(node, None, "a", attributes, "", false)
    }

    /// Entries the render pass never consumed.
    pub fn pending(&self) -> usize {
        self.table.len()
    }
}

fn same_ids(a: &[String], b: &[String]) -> bool {
    let mut a: Vec<&String> = a.iter().collect();
    let mut b: Vec<&String> = b.iter().collect();
    a.sort();
    b.sort();
    a == b
}
