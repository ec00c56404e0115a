//! Object types enabled for hover previews.

use std::collections::BTreeSet;

/// Names of object types (e.g. `confval`) whose references get hover data.
///
/// Filled by whoever declares the object types with the host; references of
/// any type not listed here pass through untouched.
#[derive(Debug, Clone, Default)]
pub struct ObjectTypes {
    names: BTreeSet<String>,
}

impl ObjectTypes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable hover for an object type. Returns false if it was already enabled.
    pub fn register(&mut self, name: impl Into<String>) -> bool {
        self.names.insert(name.into())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for ObjectTypes {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().map(Into::into).collect(),
        }
    }
}
