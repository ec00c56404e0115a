//! The `:hoverxref:` role.
//!
//! Behaves like the host's `:ref:` role: accepts either a bare target or
//! `Title <target>`, lowercases the target and collapses whitespace, and
//! produces a [`PendingXref`] for the resolution pass.

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::{HoverError, Result};
use crate::types::{NodeId, PendingXref};

/// Name of the dedicated hover role.
pub const HOVERXREF: &str = "hoverxref";

lazy_static! {
    /// `Title <target>`
    static ref EXPLICIT_TITLE: Regex = Regex::new(r"(?s)^(.+?)\s*<(.*?)>$").unwrap();

    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
}

/// A cross-reference role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XRefRole {
    pub domain: String,
    pub name: String,
    pub lowercase: bool,
    pub warn_dangling: bool,
}

impl XRefRole {
    pub fn new(domain: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            name: name.into(),
            lowercase: false,
            warn_dangling: false,
        }
    }

    /// The `std:hoverxref` role, replicating `std:ref`.
    pub fn hoverxref() -> Self {
        Self {
            domain: "std".to_string(),
            name: HOVERXREF.to_string(),
            lowercase: true,
            warn_dangling: true,
        }
    }

    /// Turn role text into a pending reference.
    pub fn process(&self, text: &str, refdoc: &str, id: NodeId) -> Result<PendingXref> {
        let text = text.trim();
        let (title, target, explicit) = match EXPLICIT_TITLE.captures(text) {
            Some(caps) => (caps[1].to_string(), caps[2].to_string(), true),
            None => (text.to_string(), text.to_string(), false),
        };

        let mut target = WHITESPACE.replace_all(target.trim(), " ").into_owned();
        if self.lowercase {
            target = target.to_lowercase();
        }
        if target.is_empty() {
            return Err(HoverError::EmptyTarget(self.name.clone()));
        }

        Ok(PendingXref {
            id,
            domain: self.domain.clone(),
            reftype: self.name.clone(),
            target,
            explicit,
            refdoc: refdoc.to_string(),
            title,
        })
    }
}
