//! Extension setup and per-build state.

use std::path::{Path, PathBuf};

use crate::assets;
use crate::config::{declare_hoverxref_values, Config, HoverConfig};
use crate::error::Result;
use crate::host::{ObjectInventory, ReferenceResolver};
use crate::registry::ObjectTypes;
use crate::resolver::HoverResolver;
use crate::role::XRefRole;

/// What the extension reports back to the host after setup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionMetadata {
    pub version: &'static str,
    pub parallel_read_safe: bool,
    pub parallel_write_safe: bool,
}

/// The hoverxref extension as registered with a host.
#[derive(Debug, Clone)]
pub struct Extension {
    config: Config,
    object_types: ObjectTypes,
    role: XRefRole,
}

impl Default for Extension {
    fn default() -> Self {
        Self::new()
    }
}

impl Extension {
    /// Create the extension and declare its configuration values.
    pub fn new() -> Self {
        let mut config = Config::new();
        declare_hoverxref_values(&mut config);
        Self::with_config(config)
    }

    /// Use a config that already has the options declared.
    pub fn with_config(config: Config) -> Self {
        Self {
            config,
            object_types: ObjectTypes::new(),
            role: XRefRole::hoverxref(),
        }
    }

    pub fn setup(&self) -> ExtensionMetadata {
        tracing::debug!(
            "hoverxref {} set up with {} config values",
            env!("CARGO_PKG_VERSION"),
            self.config.declared().count()
        );
        ExtensionMetadata {
            version: env!("CARGO_PKG_VERSION"),
            parallel_read_safe: true,
            parallel_write_safe: true,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    /// The `:hoverxref:` role to register in the `std` domain.
    pub fn role(&self) -> &XRefRole {
        &self.role
    }

    /// Enable hover for references to an object type.
    pub fn add_object_type(&mut self, name: impl Into<String>) {
        self.object_types.register(name);
    }

    pub fn object_types(&self) -> &ObjectTypes {
        &self.object_types
    }

    /// Typed config snapshot for one build.
    pub fn hover_config(&self) -> Result<HoverConfig> {
        HoverConfig::from_config(&self.config)
    }

    /// Resolver wrapping the host's domain for one build.
    pub fn resolver<'a, R>(&'a self, host: &'a R, config: &'a HoverConfig) -> HoverResolver<'a, R>
    where
        R: ReferenceResolver + ObjectInventory + ?Sized,
    {
        HoverResolver::new(host, config, &self.object_types).with_warn_dangling(self.role.warn_dangling)
    }

    pub fn script_files(&self) -> Vec<String> {
        assets::script_files()
    }

    pub fn css_files(&self) -> Vec<String> {
        assets::css_files()
    }

    /// Build-finished hook.
    pub fn build_finished(
        &self,
        outdir: &Path,
        vendor_dir: Option<&Path>,
        build_error: Option<&dyn std::error::Error>,
    ) -> Result<Vec<PathBuf>> {
        assets::copy_asset_files(&self.config, outdir, vendor_dir, build_error)
    }
}
