//! Resource tags used to narrow down discovered resources

use crate::error::{Result, SiftError};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A `NAME:VALUE` tag pair
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,
    pub value: String,
}

impl Tag {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

impl FromStr for Tag {
    type Err = SiftError;

    /// Splits on the first `:` so values may contain colons themselves
    fn from_str(s: &str) -> Result<Self> {
        match s.split_once(':') {
            Some((name, value)) if !name.is_empty() => Ok(Tag::new(name, value)),
            _ => Err(SiftError::InvalidTag(s.to_string())),
        }
    }
}

impl std::fmt::Display for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.name, self.value)
    }
}
