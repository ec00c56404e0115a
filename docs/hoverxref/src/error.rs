//! Error types for hoverxref.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the extension.
///
/// Reference resolution and tag rendering never produce these; they degrade
/// to the host's default behaviour instead. Only configuration loading, role
/// parsing and asset emission can fail.
#[derive(Error, Debug)]
pub enum HoverError {
    /// Failed to read or write a file.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// An asset template failed to compile.
    #[error("Invalid template {name}: {source}")]
    Template {
        name: String,
        source: Box<handlebars::TemplateError>,
    },

    /// An asset template failed to render.
    #[error("Failed to render {name}: {source}")]
    Render {
        name: String,
        source: Box<handlebars::RenderError>,
    },

    /// A configuration value has the wrong shape.
    #[error("Invalid value for {name}: {message}")]
    Config { name: String, message: String },

    /// A configuration file could not be parsed.
    #[error("Failed to parse {file}: {message}")]
    Parse { file: PathBuf, message: String },

    /// A role was used without a target.
    #[error("Role :{0}: requires a target")]
    EmptyTarget(String),
}

impl HoverError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn config(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Config {
            name: name.into(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, HoverError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = HoverError::config("hoverxref_tooltip_maxwidth", "expected an integer");
        assert_eq!(
            err.to_string(),
            "Invalid value for hoverxref_tooltip_maxwidth: expected an integer"
        );
    }

    #[test]
    fn test_empty_target_display() {
        let err = HoverError::EmptyTarget("hoverxref".to_string());
        assert_eq!(err.to_string(), "Role :hoverxref: requires a target");
    }

    #[test]
    fn test_io_error_keeps_path() {
        let err = HoverError::io(
            "out/_static",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(err.to_string().contains("out/_static"));
    }
}
