//! API class
//!
//! One class or interface of the merged API surface. Every relationship and
//! member is keyed by name and carries the level it first appeared at.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::element::{ApiElement, ApiField};

/// A class with its since-annotated superclasses, interfaces, methods and fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiClass {
    /// Canonical name (e.g., "android/view/View$OnClickListener")
    pub name: String,

    /// Level the class was introduced at
    pub since: u32,

    /// Superclasses by canonical name; a class that changes superclass
    /// across levels keeps one entry per superclass
    pub super_classes: BTreeMap<String, ApiElement>,

    /// Implemented interfaces by canonical name
    pub interfaces: BTreeMap<String, ApiElement>,

    /// Methods keyed by `name(params)`; the element holds the full signature
    pub methods: BTreeMap<String, ApiElement>,

    /// Fields and enum constants by name
    pub fields: BTreeMap<String, ApiField>,
}

impl ApiClass {
    pub fn new(name: impl Into<String>, since: u32) -> Self {
        Self {
            name: name.into(),
            since,
            super_classes: BTreeMap::new(),
            interfaces: BTreeMap::new(),
            methods: BTreeMap::new(),
            fields: BTreeMap::new(),
        }
    }

    /// Record that the class exists at `level`
    pub fn observe(&mut self, level: u32) {
        if level < self.since {
            self.since = level;
        }
    }

    pub fn add_super_class(&mut self, name: impl Into<String>, since: u32) {
        let since = since.max(self.since);
        Self::add_element(&mut self.super_classes, name.into(), since);
    }

    pub fn add_interface(&mut self, name: impl Into<String>, since: u32) {
        let since = since.max(self.since);
        Self::add_element(&mut self.interfaces, name.into(), since);
    }

    /// Add a method by its full signature, e.g. `draw(Landroid/graphics/Canvas;)V`.
    ///
    /// Sightings that only differ in return type share one entry; the first
    /// signature seen is kept.
    pub fn add_method(&mut self, signature: impl Into<String>, since: u32) {
        let since = since.max(self.since);
        let signature = signature.into();
        let key = method_key(&signature).to_string();

        match self.methods.get_mut(&key) {
            Some(existing) => {
                existing.observe(since);
            }
            None => {
                self.methods.insert(key, ApiElement::new(signature, since));
            }
        }
    }

    /// Add a field; a value seen later fills in a missing one
    pub fn add_field(&mut self, name: impl Into<String>, since: u32, value: Option<String>) {
        let since = since.max(self.since);
        let name = name.into();

        match self.fields.get_mut(&name) {
            Some(existing) => {
                existing.element.observe(since);
                if existing.value.is_none() {
                    existing.value = value;
                }
            }
            None => {
                self.fields.insert(name.clone(), ApiField::new(name, since, value));
            }
        }
    }

    /// Fold another sighting of this class into it, member by member
    pub fn merge(&mut self, other: ApiClass) {
        self.observe(other.since);
        for element in other.super_classes.into_values() {
            self.add_super_class(element.name, element.since);
        }
        for element in other.interfaces.into_values() {
            self.add_interface(element.name, element.since);
        }
        for element in other.methods.into_values() {
            self.add_method(element.name, element.since);
        }
        for field in other.fields.into_values() {
            self.add_field(field.element.name, field.element.since, field.value);
        }
    }

    fn add_element(map: &mut BTreeMap<String, ApiElement>, name: String, since: u32) {
        match map.get_mut(&name) {
            Some(existing) => {
                existing.observe(since);
            }
            None => {
                map.insert(name.clone(), ApiElement::new(name, since));
            }
        }
    }

    pub fn super_class_since(&self, name: &str) -> Option<u32> {
        self.super_classes.get(name).map(|e| e.since)
    }

    pub fn interface_since(&self, name: &str) -> Option<u32> {
        self.interfaces.get(name).map(|e| e.since)
    }

    /// Level a method was introduced at. Accepts a full signature or just
    /// the `name(params)` part.
    pub fn method_since(&self, signature: &str) -> Option<u32> {
        self.methods.get(method_key(signature)).map(|e| e.since)
    }

    pub fn field_since(&self, name: &str) -> Option<u32> {
        self.fields.get(name).map(|f| f.since())
    }

    pub fn field(&self, name: &str) -> Option<&ApiField> {
        self.fields.get(name)
    }

    /// Number of members and relationships
    pub fn member_count(&self) -> usize {
        self.super_classes.len() + self.interfaces.len() + self.methods.len() + self.fields.len()
    }

    /// Highest level mentioned anywhere in this class
    pub fn max_level(&self) -> u32 {
        let members = self
            .super_classes
            .values()
            .chain(self.interfaces.values())
            .chain(self.methods.values())
            .map(|e| e.since)
            .chain(self.fields.values().map(|f| f.since()));
        members.fold(self.since, u32::max)
    }
}

/// Strip the return type from a method signature
pub fn method_key(signature: &str) -> &str {
    match signature.find(')') {
        Some(index) => &signature[..=index],
        None => signature,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_key() {
        assert_eq!(method_key("draw(Landroid/graphics/Canvas;)V"), "draw(Landroid/graphics/Canvas;)");
        assert_eq!(method_key("<init>()V"), "<init>()");
        assert_eq!(method_key("odd"), "odd");
    }

    #[test]
    fn test_first_sighting_wins() {
        let mut class = ApiClass::new("android/view/View", 1);
        class.add_method("draw()V", 1);
        class.add_method("draw()V", 3);
        class.add_method("invalidate()V", 2);

        assert_eq!(class.method_since("draw()V"), Some(1));
        assert_eq!(class.method_since("invalidate()V"), Some(2));
        assert_eq!(class.methods.len(), 2);
    }

    #[test]
    fn test_return_type_does_not_split_methods() {
        let mut class = ApiClass::new("java/nio/ByteBuffer", 1);
        class.add_method("array()Ljava/lang/Object;", 1);
        class.add_method("array()[B", 9);

        assert_eq!(class.methods.len(), 1);
        assert_eq!(class.method_since("array()[B"), Some(1));
        assert_eq!(class.methods["array()"].name, "array()Ljava/lang/Object;");
    }

    #[test]
    fn test_members_never_predate_class() {
        let mut class = ApiClass::new("android/app/Fragment", 11);
        class.add_field("TAG", 3, None);
        class.add_interface("android/content/ComponentCallbacks", 1);

        assert_eq!(class.field_since("TAG"), Some(11));
        assert_eq!(class.interface_since("android/content/ComponentCallbacks"), Some(11));
    }

    #[test]
    fn test_superclass_changes_are_kept() {
        let mut class = ApiClass::new("android/widget/Foo", 1);
        class.add_super_class("java/lang/Object", 1);
        class.add_super_class("android/view/View", 5);
        class.add_super_class("java/lang/Object", 6);

        assert_eq!(class.super_class_since("java/lang/Object"), Some(1));
        assert_eq!(class.super_class_since("android/view/View"), Some(5));
        assert_eq!(class.max_level(), 5);
    }

    #[test]
    fn test_field_value_is_filled_in() {
        let mut class = ApiClass::new("android/os/Build$VERSION_CODES", 4);
        class.add_field("DONUT", 4, None);
        class.add_field("DONUT", 5, Some("4".into()));
        class.add_field("DONUT", 6, Some("99".into()));

        let field = class.field("DONUT").unwrap();
        assert_eq!(field.since(), 4);
        assert_eq!(field.value.as_deref(), Some("4"));
    }
}
