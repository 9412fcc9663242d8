//! Merged API model
//!
//! All classes seen across every processed level, keyed by canonical name.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::class::ApiClass;

/// The merged API surface of all processed levels
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiModel {
    classes: BTreeMap<String, ApiClass>,
}

/// Totals over a model, for reporting
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ModelStats {
    pub classes: usize,
    pub super_classes: usize,
    pub interfaces: usize,
    pub methods: usize,
    pub fields: usize,
    /// Highest level mentioned anywhere, 0 for an empty model
    pub max_level: u32,
}

impl ApiModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a class, creating it with `since = level` if it is new.
    /// An existing class keeps the lower of its `since` and `level`.
    pub fn get_or_create_class(&mut self, name: &str, level: u32) -> &mut ApiClass {
        let class = self
            .classes
            .entry(name.to_string())
            .or_insert_with(|| ApiClass::new(name, level));
        class.observe(level);
        class
    }

    pub fn class(&self, name: &str) -> Option<&ApiClass> {
        self.classes.get(name)
    }

    pub fn class_mut(&mut self, name: &str) -> Option<&mut ApiClass> {
        self.classes.get_mut(name)
    }

    /// Classes in canonical-name order
    pub fn classes(&self) -> impl Iterator<Item = &ApiClass> {
        self.classes.values()
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Merge another model into this one, keeping the lowest level for
    /// every class and member
    pub fn merge(&mut self, other: ApiModel) {
        for (name, class) in other.classes {
            match self.classes.get_mut(&name) {
                Some(existing) => existing.merge(class),
                None => {
                    self.classes.insert(name, class);
                }
            }
        }
    }

    pub fn stats(&self) -> ModelStats {
        self.classes.values().fold(ModelStats::default(), |mut stats, class| {
            stats.classes += 1;
            stats.super_classes += class.super_classes.len();
            stats.interfaces += class.interfaces.len();
            stats.methods += class.methods.len();
            stats.fields += class.fields.len();
            stats.max_level = stats.max_level.max(class.max_level());
            stats
        })
    }
}
