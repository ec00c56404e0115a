//! Resolution interceptor.
//!
//! Wraps the host's default resolution. Whatever the host returns is passed
//! back unchanged, except that qualifying links get the `hoverxref` class and
//! an entry in the [`HoverTable`] side-table for the render pass.

use std::collections::HashMap;

use crate::config::HoverConfig;
use crate::extract::{obj_xref_data, ref_xref_data};
use crate::host::{ObjectInventory, ReferenceResolver};
use crate::registry::ObjectTypes;
use crate::role::HOVERXREF;
use crate::types::{HoverMetadata, Node, NodeId, PendingXref};

/// Marker class put on links that carry hover data.
pub const HOVER_CLASS: &str = "hoverxref";

/// The host's generic label role.
pub const REF: &str = "ref";

/// How the host resolves a given reference type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefKind<'a> {
    /// The dedicated `:hoverxref:` role
    Hover,
    /// A plain `:ref:`
    Ref,
    /// Any other role, resolved through the object table
    Object(&'a str),
}

impl<'a> RefKind<'a> {
    pub fn classify(reftype: &'a str) -> Self {
        match reftype {
            HOVERXREF => Self::Hover,
            REF => Self::Ref,
            other => Self::Object(other),
        }
    }
}

/// What to do with a successfully resolved reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Attach hover data
    Inject,
    /// The author asked for hover but project/version are missing
    Warn,
    /// Leave the link as the host made it
    Skip,
}

/// Decide whether a resolved reference gets hover data.
pub fn hover_policy(kind: RefKind<'_>, config: &HoverConfig, object_types: &ObjectTypes) -> Decision {
    let configured = config.is_configured();
    match kind {
        RefKind::Hover if configured => Decision::Inject,
        RefKind::Hover => Decision::Warn,
        RefKind::Ref if configured && config.auto_ref => Decision::Inject,
        RefKind::Object(objtype) if configured && object_types.contains(objtype) => Decision::Inject,
        _ => Decision::Skip,
    }
}

/// Hover data stashed per link node between resolution and rendering.
#[derive(Debug, Clone, Default)]
pub struct HoverTable {
    entries: HashMap<NodeId, HoverMetadata>,
}

impl HoverTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: NodeId, metadata: HoverMetadata) {
        self.entries.insert(id, metadata);
    }

    pub fn get(&self, id: NodeId) -> Option<&HoverMetadata> {
        self.entries.get(&id)
    }

    /// Remove and return the entry; the render pass reads each one once.
    pub fn take(&mut self, id: NodeId) -> Option<HoverMetadata> {
        self.entries.remove(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Resolution entry point handed to the host in place of its own.
#[derive(Debug)]
pub struct HoverResolver<'a, R: ?Sized> {
    host: &'a R,
    config: &'a HoverConfig,
    object_types: &'a ObjectTypes,
    warn_dangling: bool,
}

impl<'a, R> HoverResolver<'a, R>
where
    R: ReferenceResolver + ObjectInventory + ?Sized,
{
    pub fn new(host: &'a R, config: &'a HoverConfig, object_types: &'a ObjectTypes) -> Self {
        Self {
            host,
            config,
            object_types,
            warn_dangling: false,
        }
    }

    /// Warn when a `:hoverxref:` target cannot be resolved.
    pub fn with_warn_dangling(mut self, warn_dangling: bool) -> Self {
        self.warn_dangling = warn_dangling;
        self
    }

    /// Resolve a pending reference, recording hover data in `table` when the
    /// reference qualifies. Returns `None` exactly when the host does.
    pub fn resolve_xref(
        &self,
        fromdocname: &str,
        xref: &PendingXref,
        table: &mut HoverTable,
    ) -> Option<Node> {
        let kind = RefKind::classify(&xref.reftype);
        let resolved = match kind {
            RefKind::Hover | RefKind::Ref => self.host.resolve_ref_xref(fromdocname, xref),
            RefKind::Object(objtype) => self.host.resolve_obj_xref(fromdocname, objtype, xref),
        };
        let Some(mut refnode) = resolved else {
            if self.warn_dangling && kind == RefKind::Hover {
                tracing::warn!(refdoc = %xref.refdoc, "undefined label: {}", xref.target);
            }
            return None;
        };

        match hover_policy(kind, self.config, self.object_types) {
            Decision::Inject => self.inject(fromdocname, xref, kind, &mut refnode, table),
            Decision::Warn => {
                tracing::warn!(
                    docname = fromdocname,
                    reftarget = %xref.target,
                    "hoverxref role is not fully configured"
                );
            }
            Decision::Skip => {}
        }

        Some(refnode)
    }

    fn inject(
        &self,
        fromdocname: &str,
        xref: &PendingXref,
        kind: RefKind<'_>,
        refnode: &mut Node,
        table: &mut HoverTable,
    ) {
        let Some((project, version)) = self.config.project_version() else {
            return;
        };

        let location = match kind {
            RefKind::Object(objtype) => obj_xref_data(self.host, objtype, &xref.target)
                .map(|o| (o.docname, o.labelid)),
            RefKind::Hover | RefKind::Ref => {
                ref_xref_data(self.host, xref).map(|l| (l.docname, l.labelid))
            }
        };
        let Some((doc, section)) = location else {
            tracing::debug!(reftarget = %xref.target, "resolved reference has no inventory entry");
            return;
        };

        let metadata = HoverMetadata {
            project: project.to_string(),
            version: version.to_string(),
            doc,
            section,
        };

        refnode.replace_classes([HOVER_CLASS]);
        tracing::info!(
            ":{}:{}: hover data injected: fromdocname={} {}",
            xref.domain,
            xref.reftype,
            fromdocname,
            metadata
        );
        table.insert(refnode.id, metadata);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{hoverxref_decls, Config, AUTO_REF, PROJECT, VERSION};
    use crate::host::StandardDomain;

    fn hover_config(project: Option<&str>, version: Option<&str>, auto_ref: bool) -> HoverConfig {
        let mut config = Config::new();
        for decl in hoverxref_decls(None, None) {
            config.declare(decl);
        }
        if let Some(p) = project {
            config.set(PROJECT, p).unwrap();
        }
        if let Some(v) = version {
            config.set(VERSION, v).unwrap();
        }
        config.set(AUTO_REF, auto_ref).unwrap();
        HoverConfig::from_config(&config).unwrap()
    }

    fn domain() -> StandardDomain {
        let mut domain = StandardDomain::new();
        domain.add_label("chapter-i", "chapter-i", "chapter-i", "Chapter I");
        domain.add_label("section-i", "chapter-i", "section-i", "Section I");
        domain.add_object("confval", "conf-title", "configuration", "confval-conf-title");
        domain
    }

    fn xref(reftype: &str, target: &str, id: u64) -> PendingXref {
        PendingXref {
            id: NodeId(id),
            domain: "std".to_string(),
            reftype: reftype.to_string(),
            target: target.to_string(),
            explicit: false,
            refdoc: "index".to_string(),
            title: target.to_string(),
        }
    }

    #[test]
    fn test_classify() {
        assert_eq!(RefKind::classify("hoverxref"), RefKind::Hover);
        assert_eq!(RefKind::classify("ref"), RefKind::Ref);
        assert_eq!(RefKind::classify("confval"), RefKind::Object("confval"));
    }

    #[test]
    fn test_policy_table() {
        let configured = hover_config(Some("p"), Some("v"), false);
        let auto = hover_config(Some("p"), Some("v"), true);
        let bare = hover_config(None, None, true);
        let types: ObjectTypes = ["confval"].into_iter().collect();

        assert_eq!(hover_policy(RefKind::Hover, &configured, &types), Decision::Inject);
        assert_eq!(hover_policy(RefKind::Hover, &bare, &types), Decision::Warn);
        assert_eq!(hover_policy(RefKind::Ref, &configured, &types), Decision::Skip);
        assert_eq!(hover_policy(RefKind::Ref, &auto, &types), Decision::Inject);
        assert_eq!(hover_policy(RefKind::Ref, &bare, &types), Decision::Skip);
        assert_eq!(hover_policy(RefKind::Object("confval"), &configured, &types), Decision::Inject);
        assert_eq!(hover_policy(RefKind::Object("confval"), &bare, &types), Decision::Skip);
        assert_eq!(hover_policy(RefKind::Object("option"), &auto, &types), Decision::Skip);
    }

    #[test]
    fn test_hover_role_injects() {
        let domain = domain();
        let config = hover_config(Some("myproject"), Some("myversion"), false);
        let types = ObjectTypes::new();
        let resolver = HoverResolver::new(&domain, &config, &types);
        let mut table = HoverTable::new();

        let node = resolver
            .resolve_xref("index", &xref("hoverxref", "section-i", 1), &mut table)
            .unwrap();

        assert_eq!(node.classes, vec!["hoverxref"]);
        assert_eq!(
            table.get(NodeId(1)),
            Some(&HoverMetadata {
                project: "myproject".to_string(),
                version: "myversion".to_string(),
                doc: "chapter-i".to_string(),
                section: "section-i".to_string(),
            })
        );
    }

    #[test]
    fn test_hover_role_unconfigured() {
        let domain = domain();
        let config = hover_config(None, None, false);
        let types = ObjectTypes::new();
        let resolver = HoverResolver::new(&domain, &config, &types);
        let mut table = HoverTable::new();

        let node = resolver
            .resolve_xref("index", &xref("hoverxref", "section-i", 1), &mut table)
            .unwrap();

        assert!(node.classes.is_empty());
        assert!(table.is_empty());
    }

    #[test]
    fn test_plain_ref_untouched_without_auto_ref() {
        let domain = domain();
        let config = hover_config(Some("p"), Some("v"), false);
        let types = ObjectTypes::new();
        let resolver = HoverResolver::new(&domain, &config, &types);
        let mut table = HoverTable::new();

        let node = resolver
            .resolve_xref("index", &xref("ref", "chapter-i", 2), &mut table)
            .unwrap();
        assert!(node.classes.is_empty());
        assert!(table.is_empty());
    }

    #[test]
    fn test_auto_ref() {
        let domain = domain();
        let config = hover_config(Some("p"), Some("v"), true);
        let types = ObjectTypes::new();
        let resolver = HoverResolver::new(&domain, &config, &types);
        let mut table = HoverTable::new();

        resolver
            .resolve_xref("index", &xref("ref", "chapter-i", 2), &mut table)
            .unwrap();
        assert_eq!(table.get(NodeId(2)).unwrap().section, "chapter-i");
    }

    #[test]
    fn test_object_type() {
        let domain = domain();
        let config = hover_config(Some("p"), Some("v"), false);
        let types: ObjectTypes = ["confval"].into_iter().collect();
        let resolver = HoverResolver::new(&domain, &config, &types);
        let mut table = HoverTable::new();

        let node = resolver
            .resolve_xref("index", &xref("confval", "conf-title", 3), &mut table)
            .unwrap();
        assert_eq!(node.classes, vec!["hoverxref"]);
        let meta = table.take(NodeId(3)).unwrap();
        assert_eq!(meta.doc, "configuration");
        assert_eq!(meta.section, "confval-conf-title");
        assert!(table.take(NodeId(3)).is_none());
    }

    #[test]
    fn test_unregistered_object_type_passes_through() {
        let domain = domain();
        let config = hover_config(Some("p"), Some("v"), true);
        let types = ObjectTypes::new();
        let resolver = HoverResolver::new(&domain, &config, &types);
        let mut table = HoverTable::new();

        let node = resolver
            .resolve_xref("index", &xref("confval", "conf-title", 3), &mut table)
            .unwrap();
        assert!(node.classes.is_empty());
        assert!(table.is_empty());
    }

    #[test]
    fn test_unresolved_propagates() {
        let domain = domain();
        let config = hover_config(Some("p"), Some("v"), true);
        let types: ObjectTypes = ["confval"].into_iter().collect();
        let resolver = HoverResolver::new(&domain, &config, &types);
        let mut table = HoverTable::new();

        assert!(resolver
            .resolve_xref("index", &xref("hoverxref", "missing", 4), &mut table)
            .is_none());
        assert!(resolver
            .resolve_xref("index", &xref("confval", "missing", 5), &mut table)
            .is_none());
        assert!(table.is_empty());
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let domain = domain();
        let config = hover_config(Some("p"), Some("v"), false);
        let types = ObjectTypes::new();
        let resolver = HoverResolver::new(&domain, &config, &types);

        let mut first = HoverTable::new();
        let mut second = HoverTable::new();
        let pending = xref("hoverxref", "section-i", 9);
        let a = resolver.resolve_xref("index", &pending, &mut first);
        let b = resolver.resolve_xref("index", &pending, &mut second);
        assert_eq!(a, b);
        assert_eq!(first.get(NodeId(9)), second.get(NodeId(9)));
    }
}
