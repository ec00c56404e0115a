//! Client asset emission.
//!
//! After a successful build the tooltip script and styles are written under
//! `<outdir>/_static/`. Files ending in `_t` are templates: they are rendered
//! with every `hoverxref_*` option as context and written without the suffix.

use handlebars::{handlebars_helper, Handlebars};
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::{Config, ConfigValue, PREFIX};
use crate::error::{HoverError, Result};

/// Marks a template asset.
pub const TEMPLATE_SUFFIX: &str = "_t";

/// Where an asset's bytes come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetSource {
    /// Shipped inside the crate
    Embedded(&'static str),
    /// Third-party file looked up in the vendor directory
    Vendor,
}

/// One file of the client asset set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssetFile {
    /// Path relative to the asset root, e.g. `js/hoverxref.js_t`
    pub path: &'static str,
    pub source: AssetSource,
}

impl AssetFile {
    pub fn is_template(&self) -> bool {
        self.path.ends_with(TEMPLATE_SUFFIX)
    }

    /// File name with the template marker stripped.
    pub fn output_name(&self) -> &'static str {
        let name = self.path.rsplit('/').next().unwrap_or(self.path);
        name.strip_suffix(TEMPLATE_SUFFIX).unwrap_or(name)
    }

    /// Output subdirectory, taken from the file extension.
    pub fn output_dir(&self) -> &'static str {
        self.output_name().rsplit('.').next().unwrap_or("")
    }

    /// Path under `_static/` the asset ends up at.
    pub fn output_path(&self) -> String {
        format!("{}/{}", self.output_dir(), self.output_name())
    }
}

pub const ASSET_FILES: &[AssetFile] = &[
    AssetFile {
        path: "js/hoverxref.js_t",
        source: AssetSource::Embedded(include_str!("../_static/js/hoverxref.js_t")),
    },
    AssetFile {
        path: "js/tooltipster.bundle.min.js",
        source: AssetSource::Vendor,
    },
    AssetFile {
        path: "css/tooltipster.custom.css",
        source: AssetSource::Embedded(include_str!("../_static/css/tooltipster.custom.css")),
    },
    AssetFile {
        path: "css/tooltipster.bundle.min.css",
        source: AssetSource::Vendor,
    },
    AssetFile {
        path: "css/tooltipster-sideTip-shadow.min.css",
        source: AssetSource::Vendor,
    },
];

/// Scripts each page must load, relative to `_static/`.
pub fn script_files() -> Vec<String> {
    ASSET_FILES
        .iter()
        .filter(|f| f.output_dir() == "js")
        .map(AssetFile::output_path)
        .collect()
}

/// Stylesheets each page must load, relative to `_static/`.
pub fn css_files() -> Vec<String> {
    ASSET_FILES
        .iter()
        .filter(|f| f.output_dir() == "css")
        .map(AssetFile::output_path)
        .collect()
}

fn to_json(value: &ConfigValue) -> Value {
    match value {
        ConfigValue::Null => Value::Null,
        ConfigValue::Bool(b) => Value::Bool(*b),
        ConfigValue::Int(n) => Value::from(*n),
        ConfigValue::Str(s) => Value::String(s.clone()),
        ConfigValue::List(items) => Value::Array(items.iter().cloned().map(Value::String).collect()),
    }
}

/// Template context: declared defaults first, then the active values.
pub fn template_context(config: &Config) -> Map<String, Value> {
    let mut context = Map::new();
    for decl in config.declared().filter(|d| d.name.starts_with(PREFIX)) {
        context.insert(decl.name.clone(), to_json(&decl.default));
    }
    for (name, value) in config.values().filter(|(name, _)| name.starts_with(PREFIX)) {
        context.insert(name.to_string(), to_json(value));
    }
    context
}

/// Render a value as a JavaScript literal.
pub fn to_js_literal(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => format!("'{}'", escape_js(s)),
        Value::Array(items) => {
            let items: Vec<String> = items.iter().map(to_js_literal).collect();
            format!("[{}]", items.join(", "))
        }
        Value::Object(map) => {
            let entries: Vec<String> = map
                .iter()
                .map(|(k, v)| format!("'{}': {}", escape_js(k), to_js_literal(v)))
                .collect();
            format!("{{{}}}", entries.join(", "))
        }
    }
}

fn escape_js(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('\'', "\\'")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace("</", "<\\/")
}

handlebars_helper!(js_literal: |value: Json| to_js_literal(value));

/// Render one template against the context.
pub fn render_template(name: &str, source: &str, context: &Map<String, Value>) -> Result<String> {
    let mut registry = Handlebars::new();
    registry.register_escape_fn(handlebars::no_escape);
    registry.set_strict_mode(true);
    registry.register_helper("js", Box::new(js_literal));

    registry
        .register_template_string(name, source)
        .map_err(|e| HoverError::Template {
            name: name.to_string(),
            source: Box::new(e),
        })?;
    registry.render(name, context).map_err(|e| HoverError::Render {
        name: name.to_string(),
        source: Box::new(e),
    })
}

/// Produce the output bytes of every available asset, keyed by output path.
fn render_assets(config: &Config, vendor_dir: Option<&Path>) -> Result<Vec<(String, Vec<u8>)>> {
    let context = template_context(config);
    let mut rendered = Vec::with_capacity(ASSET_FILES.len());

    for asset in ASSET_FILES {
        let bytes = match asset.source {
            AssetSource::Embedded(source) if asset.is_template() => {
                render_template(asset.path, source, &context)?.into_bytes()
            }
            AssetSource::Embedded(source) => source.as_bytes().to_vec(),
            AssetSource::Vendor => {
                let Some(dir) = vendor_dir else {
                    tracing::warn!("no vendor directory given, skipping {}", asset.path);
                    continue;
                };
                let path = dir.join(asset.path);
                if !path.is_file() {
                    tracing::warn!("vendor asset {} not found, skipping", path.display());
                    continue;
                }
                fs::read(&path).map_err(|e| HoverError::io(&path, e))?
            }
        };
        rendered.push((asset.output_path(), bytes));
    }

    Ok(rendered)
}

/// Build-finished hook: write the client assets under `<outdir>/_static/`.
///
/// Does nothing when the build failed. All assets are rendered before the
/// first write, so a template error leaves the output tree untouched.
pub fn copy_asset_files(
    config: &Config,
    outdir: &Path,
    vendor_dir: Option<&Path>,
    build_error: Option<&dyn std::error::Error>,
) -> Result<Vec<PathBuf>> {
    if let Some(err) = build_error {
        tracing::info!("build failed, not copying hoverxref assets: {}", err);
        return Ok(Vec::new());
    }

    let rendered = render_assets(config, vendor_dir)?;
    let static_dir = outdir.join("_static");
    let mut written = Vec::with_capacity(rendered.len());

    for (relative, bytes) in rendered {
        let dest = static_dir.join(&relative);
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent).map_err(|e| HoverError::io(parent, e))?;
        }
        fs::write(&dest, &bytes).map_err(|e| HoverError::io(&dest, e))?;
        tracing::debug!("copied asset {}", dest.display());
        written.push(dest);
    }

    Ok(written)
}
