//! API elements
//!
//! The since-annotated leaves of the model: superclass and interface links,
//! methods and fields.

use serde::{Deserialize, Serialize};

/// A named API element and the lowest level it was seen at
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiElement {
    /// Canonical name or full method signature
    pub name: String,

    /// Lowest API level this element is known to exist at
    pub since: u32,
}

impl ApiElement {
    pub fn new(name: impl Into<String>, since: u32) -> Self {
        Self {
            name: name.into(),
            since,
        }
    }

    /// Record a sighting at `level`, keeping the lowest level.
    /// Returns true if `since` moved down.
    pub fn observe(&mut self, level: u32) -> bool {
        if level < self.since {
            self.since = level;
            true
        } else {
            false
        }
    }
}

/// A field or enum constant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiField {
    #[serde(flatten)]
    pub element: ApiElement,

    /// Constant value literal as spelled in the signature file
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub value: Option<String>,
}

impl ApiField {
    pub fn new(name: impl Into<String>, since: u32, value: Option<String>) -> Self {
        Self {
            element: ApiElement::new(name, since),
            value,
        }
    }

    pub fn name(&self) -> &str {
        &self.element.name
    }

    pub fn since(&self) -> u32 {
        self.element.since
    }
}
