//! Hover Cross-Reference Tooltips
//!
//! A documentation-generator extension that shows a preview of the target
//! section when the reader hovers over a cross-reference.
//!
//! # Features
//!
//! - `:hoverxref:` role, usable anywhere `:ref:` is
//! - Optional hover data on every `:ref:` (`hoverxref_auto_ref`)
//! - Hover data on references to registered object types
//! - `data-project`, `data-version`, `data-doc`, `data-section` on qualifying links
//! - Client script rendered from the active configuration
//!
//! # Example
//!
//! ```no_run
//! use hoverxref::{Extension, HoverTable, HoverTranslator, DocutilsEmitter, NodeId, StandardDomain};
//!
//! let mut ext = Extension::new();
//! ext.config_mut().set_pair("hoverxref_project=myproject").unwrap();
//! ext.config_mut().set_pair("hoverxref_version=latest").unwrap();
//!
//! let mut domain = StandardDomain::new();
//! domain.add_label("section-i", "chapter-i", "section-i", "Section I");
//!
//! let config = ext.hover_config().unwrap();
//! let xref = ext.role().process("section-i", "index", NodeId(1)).unwrap();
//! let mut table = HoverTable::new();
//! let node = ext.resolver(&domain, &config).resolve_xref("index", &xref, &mut table).unwrap();
//!
//! let html = HoverTranslator::new(DocutilsEmitter, &mut table).visit_reference(&node);
//! assert!(html.contains("data-section=\"section-i\""));
//! ```

pub mod assets;
pub mod config;
pub mod error;
pub mod extension;
pub mod extract;
pub mod host;
pub mod registry;
pub mod render;
pub mod resolver;
pub mod role;
pub mod types;

pub use config::{Config, ConfigDecl, ConfigValue, HoverConfig, Rebuild, TooltipOptions};
pub use error::{HoverError, Result};
pub use extension::{Extension, ExtensionMetadata};
pub use host::{DocutilsEmitter, ObjectInventory, ReferenceResolver, StandardDomain, TagEmitter};
pub use registry::ObjectTypes;
pub use render::HoverTranslator;
pub use resolver::{hover_policy, Decision, HoverResolver, HoverTable, RefKind, HOVER_CLASS};
pub use role::XRefRole;
pub use types::*;
