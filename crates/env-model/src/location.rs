//! Descriptor locations
//!
//! A [`DescriptorLocation`] pins a validation issue to the descriptor it
//! came from and to a dotted/indexed path inside the merged model, e.g.
//! `hooks.init.before[0]`.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Origin descriptor plus path inside the model
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DescriptorLocation {
    /// Identifier of the descriptor layer the located value was declared in
    #[serde(rename = "Descriptor")]
    pub descriptor: String,

    /// Dotted path, empty for the root of the model
    #[serde(rename = "Path")]
    pub path: String,
}

impl DescriptorLocation {
    /// Root location of a descriptor
    pub fn new(descriptor: impl Into<String>) -> Self {
        Self {
            descriptor: descriptor.into(),
            path: String::new(),
        }
    }

    /// Extend the path with a field name.
    pub fn appending(&self, field: &str) -> Self {
        let path = if self.path.is_empty() {
            field.to_string()
        } else {
            format!("{}.{}", self.path, field)
        };
        Self {
            descriptor: self.descriptor.clone(),
            path,
        }
    }

    /// The same path inside another descriptor.
    pub fn with_descriptor(&self, descriptor: &str) -> Self {
        Self {
            descriptor: descriptor.to_string(),
            path: self.path.clone(),
        }
    }

    /// Extend the path with a sequence index.
    pub fn appending_index(&self, index: usize) -> Self {
        Self {
            descriptor: self.descriptor.clone(),
            path: format!("{}[{}]", self.path, index),
        }
    }
}

impl fmt::Display for DescriptorLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path)
    }
}
