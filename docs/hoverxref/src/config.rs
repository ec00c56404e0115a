//! Configuration values.
//!
//! Options are declared once with a default and a rebuild scope, then
//! overridden per build from a config file or `key=value` pairs. A typed
//! [`HoverConfig`] snapshot is taken at build start and passed by reference
//! into the interceptors.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use crate::error::{HoverError, Result};

/// Prefix shared by every option this extension declares.
pub const PREFIX: &str = "hoverxref_";

pub const PROJECT: &str = "hoverxref_project";
pub const VERSION: &str = "hoverxref_version";
pub const AUTO_REF: &str = "hoverxref_auto_ref";
pub const API_HOST: &str = "hoverxref_tooltip_api_host";
pub const THEME: &str = "hoverxref_tooltip_theme";
pub const INTERACTIVE: &str = "hoverxref_tooltip_interactive";
pub const MAXWIDTH: &str = "hoverxref_tooltip_maxwidth";
pub const ANIMATION: &str = "hoverxref_tooltip_animation";
pub const ANIMATION_DURATION: &str = "hoverxref_tooltip_animation_duration";
pub const CONTENT: &str = "hoverxref_tooltip_content";
pub const CLASS: &str = "hoverxref_tooltip_class";

/// A configuration value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    Null,
    Bool(bool),
    Int(i64),
    Str(String),
    List(Vec<String>),
}

impl ConfigValue {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Str(_) => "string",
            Self::List(_) => "list",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    fn same_kind(&self, other: &Self) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }

    /// Parse a command-line string according to the declared default's kind.
    fn parse_like(default: &Self, raw: &str) -> std::result::Result<Self, String> {
        match default {
            Self::Bool(_) => match raw.to_lowercase().as_str() {
                "true" | "yes" | "1" => Ok(Self::Bool(true)),
                "false" | "no" | "0" => Ok(Self::Bool(false)),
                _ => Err(format!("expected a boolean, got '{}'", raw)),
            },
            Self::Int(_) => raw
                .trim()
                .parse()
                .map(Self::Int)
                .map_err(|_| format!("expected an integer, got '{}'", raw)),
            Self::List(_) => Ok(Self::List(
                raw.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(String::from)
                    .collect(),
            )),
            Self::Null | Self::Str(_) => Ok(Self::Str(raw.to_string())),
        }
    }

    /// Convert a value read from a config file. Scalars given to a string
    /// option are kept as their source text, so `version: 1.0` stays `"1.0"`.
    fn from_file_value(default: &Self, raw: serde_json::Value) -> std::result::Result<Self, String> {
        use serde_json::Value;

        let stringly = matches!(default, Self::Null | Self::Str(_));
        match raw {
            Value::Null => Ok(Self::Null),
            Value::Bool(b) if stringly => Ok(Self::Str(b.to_string())),
            Value::Bool(b) => Ok(Self::Bool(b)),
            Value::Number(n) if stringly => Ok(Self::Str(n.to_string())),
            Value::Number(n) => n
                .as_i64()
                .map(Self::Int)
                .ok_or_else(|| format!("expected an integer, got {}", n)),
            Value::String(s) => Ok(Self::Str(s)),
            Value::Array(items) => items
                .into_iter()
                .map(|item| match item {
                    Value::String(s) => Ok(s),
                    Value::Number(n) => Ok(n.to_string()),
                    other => Err(format!("expected a list of strings, got {}", other)),
                })
                .collect::<std::result::Result<Vec<_>, _>>()
                .map(Self::List),
            Value::Object(_) => Err("expected a scalar or a list, got a mapping".to_string()),
        }
    }
}

impl From<&str> for ConfigValue {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<bool> for ConfigValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for ConfigValue {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<Option<String>> for ConfigValue {
    fn from(s: Option<String>) -> Self {
        s.map(Self::Str).unwrap_or(Self::Null)
    }
}

/// What a changed value invalidates in the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rebuild {
    /// Only HTML output needs regenerating
    Html,
    /// The whole environment is re-read
    Env,
}

impl fmt::Display for Rebuild {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Html => f.write_str("html"),
            Self::Env => f.write_str("env"),
        }
    }
}

/// A declared configuration option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigDecl {
    pub name: String,
    pub default: ConfigValue,
    pub rebuild: Rebuild,
}

impl ConfigDecl {
    pub fn new(name: impl Into<String>, default: impl Into<ConfigValue>, rebuild: Rebuild) -> Self {
        Self {
            name: name.into(),
            default: default.into(),
            rebuild,
        }
    }
}

/// Declared options plus the overrides active for this build.
#[derive(Debug, Clone, Default)]
pub struct Config {
    decls: BTreeMap<String, ConfigDecl>,
    overrides: BTreeMap<String, ConfigValue>,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn declare(&mut self, decl: ConfigDecl) {
        self.decls.insert(decl.name.clone(), decl);
    }

    pub fn is_declared(&self, name: &str) -> bool {
        self.decls.contains_key(name)
    }

    /// Override a declared option.
    ///
    /// Options declared with a `null` default accept any value. Otherwise the
    /// override must have the same kind as the default, except that `null`
    /// always resets.
    pub fn set(&mut self, name: &str, value: impl Into<ConfigValue>) -> Result<()> {
        let value = value.into();
        let Some(decl) = self.decls.get(name) else {
            tracing::warn!("unknown config value {} in override, ignoring", name);
            return Ok(());
        };

        let compatible = matches!(decl.default, ConfigValue::Null)
            || matches!(value, ConfigValue::Null)
            || decl.default.same_kind(&value);
        if !compatible {
            return Err(HoverError::config(
                name,
                format!("expected {}, got {}", decl.default.kind(), value.kind()),
            ));
        }

        self.overrides.insert(name.to_string(), value);
        Ok(())
    }

    /// Override from a `name=value` pair, parsed by the declared kind.
    pub fn set_pair(&mut self, pair: &str) -> Result<()> {
        let (name, raw) = pair
            .split_once('=')
            .ok_or_else(|| HoverError::config(pair, "expected name=value"))?;
        let name = name.trim();
        let Some(decl) = self.decls.get(name) else {
            tracing::warn!("unknown config value {} in override, ignoring", name);
            return Ok(());
        };
        let value =
            ConfigValue::parse_like(&decl.default, raw).map_err(|msg| HoverError::config(name, msg))?;
        self.set(name, value)
    }

    /// Load overrides from a YAML or JSON file.
    pub fn load_file(&mut self, path: &Path) -> Result<()> {
        let source = std::fs::read_to_string(path).map_err(|e| HoverError::io(path, e))?;
        let parse_err = |message: String| HoverError::Parse {
            file: path.to_path_buf(),
            message,
        };

        let values: BTreeMap<String, serde_json::Value> =
            match path.extension().and_then(|e| e.to_str()) {
                Some("json") => serde_json::from_str(&source).map_err(|e| parse_err(e.to_string()))?,
                Some("yaml") | Some("yml") => {
                    serde_yaml::from_str(&source).map_err(|e| parse_err(e.to_string()))?
                }
                _ => return Err(parse_err("expected a .json, .yaml or .yml file".to_string())),
            };

        for (name, raw) in values {
            let Some(decl) = self.decls.get(&name) else {
                tracing::warn!("unknown config value {} in {}, ignoring", name, path.display());
                continue;
            };
            let value = ConfigValue::from_file_value(&decl.default, raw)
                .map_err(|msg| HoverError::config(&name, msg))?;
            self.set(&name, value)?;
        }
        Ok(())
    }

    /// Active value: the override if present, else the declared default.
    pub fn get(&self, name: &str) -> Option<&ConfigValue> {
        self.overrides
            .get(name)
            .or_else(|| self.decls.get(name).map(|d| &d.default))
    }

    pub fn declared(&self) -> impl Iterator<Item = &ConfigDecl> {
        self.decls.values()
    }

    /// Every declared option with its active value.
    pub fn values(&self) -> impl Iterator<Item = (&str, &ConfigValue)> {
        self.decls
            .keys()
            .filter_map(move |name| self.get(name).map(|value| (name.as_str(), value)))
    }

    fn str_opt(&self, name: &str) -> Result<Option<String>> {
        match self.get(name) {
            None | Some(ConfigValue::Null) => Ok(None),
            Some(ConfigValue::Str(s)) => Ok(Some(s.clone())),
            Some(other) => Err(HoverError::config(name, format!("expected string, got {}", other.kind()))),
        }
    }

    fn str_req(&self, name: &str) -> Result<String> {
        self.str_opt(name)?
            .ok_or_else(|| HoverError::config(name, "value is required"))
    }

    fn bool(&self, name: &str) -> Result<bool> {
        match self.get(name) {
            Some(ConfigValue::Bool(b)) => Ok(*b),
            Some(other) => Err(HoverError::config(name, format!("expected bool, got {}", other.kind()))),
            None => Err(HoverError::config(name, "value is required")),
        }
    }

    fn int(&self, name: &str) -> Result<i64> {
        match self.get(name) {
            Some(ConfigValue::Int(n)) => Ok(*n),
            Some(other) => Err(HoverError::config(name, format!("expected int, got {}", other.kind()))),
            None => Err(HoverError::config(name, "value is required")),
        }
    }

    fn list(&self, name: &str) -> Result<Vec<String>> {
        match self.get(name) {
            Some(ConfigValue::List(items)) => Ok(items.clone()),
            Some(other) => Err(HoverError::config(name, format!("expected list, got {}", other.kind()))),
            None => Err(HoverError::config(name, "value is required")),
        }
    }
}

/// The options this extension declares, with their defaults.
pub fn hoverxref_decls(default_project: Option<String>, default_version: Option<String>) -> Vec<ConfigDecl> {
    vec![
        ConfigDecl::new(PROJECT, default_project, Rebuild::Html),
        ConfigDecl::new(VERSION, default_version, Rebuild::Html),
        ConfigDecl::new(AUTO_REF, false, Rebuild::Env),
        ConfigDecl::new(API_HOST, "https://readthedocs.org", Rebuild::Env),
        ConfigDecl::new(
            THEME,
            ConfigValue::List(vec![
                "tooltipster-shadow".to_string(),
                "tooltipster-shadow-custom".to_string(),
            ]),
            Rebuild::Env,
        ),
        ConfigDecl::new(INTERACTIVE, true, Rebuild::Env),
        ConfigDecl::new(MAXWIDTH, 450i64, Rebuild::Env),
        ConfigDecl::new(ANIMATION, "fade", Rebuild::Env),
        ConfigDecl::new(ANIMATION_DURATION, 0i64, Rebuild::Env),
        ConfigDecl::new(CONTENT, "Loading...", Rebuild::Env),
        ConfigDecl::new(CLASS, "rst-content", Rebuild::Env),
    ]
}

/// Declare every option, taking project and version defaults from the
/// Read the Docs build environment.
pub fn declare_hoverxref_values(config: &mut Config) {
    let project = std::env::var("READTHEDOCS_PROJECT").ok();
    let version = std::env::var("READTHEDOCS_VERSION").ok();
    for decl in hoverxref_decls(project, version) {
        config.declare(decl);
    }
}

/// Tooltip appearance options. Only used for asset templating.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TooltipOptions {
    pub api_host: String,
    pub theme: Vec<String>,
    pub interactive: bool,
    pub maxwidth: i64,
    pub animation: String,
    pub animation_duration: i64,
    pub content: String,
    pub class: String,
}

/// Typed view of the active configuration, built once per build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HoverConfig {
    pub project: Option<String>,
    pub version: Option<String>,
    pub auto_ref: bool,
    pub tooltip: TooltipOptions,
}

impl HoverConfig {
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self {
            project: config.str_opt(PROJECT)?,
            version: config.str_opt(VERSION)?,
            auto_ref: config.bool(AUTO_REF)?,
            tooltip: TooltipOptions {
                api_host: config.str_req(API_HOST)?,
                theme: config.list(THEME)?,
                interactive: config.bool(INTERACTIVE)?,
                maxwidth: config.int(MAXWIDTH)?,
                animation: config.str_req(ANIMATION)?,
                animation_duration: config.int(ANIMATION_DURATION)?,
                content: config.str_req(CONTENT)?,
                class: config.str_req(CLASS)?,
            },
        })
    }

    /// Project and version are both set and non-empty.
    pub fn is_configured(&self) -> bool {
        self.project_version().is_some()
    }

    pub fn project_version(&self) -> Option<(&str, &str)> {
        match (self.project.as_deref(), self.version.as_deref()) {
            (Some(p), Some(v)) if !p.is_empty() && !v.is_empty() => Some((p, v)),
            _ => None,
        }
    }
}
