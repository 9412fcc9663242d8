//! Parser state
//!
//! Both signature formats report what they recognize through
//! [`SignatureSink`]. [`ParserState`] is the sink that merges one level's
//! declarations into the shared [`ApiModel`].

use r_droid_api_model::{ApiClass, ApiModel};
use r_droid_apigen_core::{ApiGenError, Result};
use tracing::trace;

use crate::descriptor::{canonical_class_name, encode_type};

/// A method or constructor signature under construction.
///
/// Started by [`SignatureSink::start_new_method`] or
/// [`SignatureSink::start_new_constructor`] and consumed by
/// [`SignatureSink::finish_method`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodBuilder {
    name: String,
    params: String,
    return_type: String,
}

impl MethodBuilder {
    pub fn constructor() -> Self {
        Self {
            name: "<init>".to_string(),
            params: String::new(),
            return_type: "V".to_string(),
        }
    }

    /// A method returning `return_type`; an absent return type leaves the
    /// descriptor without one
    pub fn method(name: &str, return_type: Option<&str>) -> Self {
        Self {
            name: name.to_string(),
            params: String::new(),
            return_type: return_type.map(encode_type).unwrap_or_default(),
        }
    }

    pub fn add_method_parameter(&mut self, type_name: &str) {
        self.params.push_str(&encode_type(type_name));
    }

    /// The signature string, e.g. `draw(Landroid/graphics/Canvas;)V`
    pub fn finish(self) -> String {
        format!("{}({}){}", self.name, self.params, self.return_type)
    }
}

/// Receiver of grammar events from a signature parser
pub trait SignatureSink {
    fn add_package(&mut self, name: &str) -> Result<()>;

    /// Open a class; `name` is relative to the current package
    fn add_class(&mut self, name: &str) -> Result<()>;

    fn add_super_class(&mut self, name: &str) -> Result<()>;

    fn add_interface(&mut self, name: &str) -> Result<()>;

    fn start_new_constructor(&mut self) -> MethodBuilder {
        MethodBuilder::constructor()
    }

    fn start_new_method(&mut self, name: &str, return_type: Option<&str>) -> MethodBuilder {
        MethodBuilder::method(name, return_type)
    }

    fn finish_method(&mut self, method: MethodBuilder) -> Result<()>;

    fn add_field(&mut self, name: &str, value: Option<&str>) -> Result<()>;

    fn finish_class(&mut self);

    fn finish_package(&mut self);

    /// End of input
    fn done(&mut self) {
        self.finish_package();
    }
}

/// Declarations seen while parsing one file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeclarationCounts {
    pub packages: usize,
    pub classes: usize,
    pub methods: usize,
    pub fields: usize,
}

/// Merges one API level into the model
pub struct ParserState<'m> {
    level: u32,
    model: &'m mut ApiModel,
    current_package: Option<String>,
    current_class: Option<String>,
    counts: DeclarationCounts,
}

impl<'m> ParserState<'m> {
    pub fn new(model: &'m mut ApiModel, level: u32) -> Self {
        Self {
            level,
            model,
            current_package: None,
            current_class: None,
            counts: DeclarationCounts::default(),
        }
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn counts(&self) -> DeclarationCounts {
        self.counts
    }

    fn current_class(&mut self, what: &str) -> Result<&mut ApiClass> {
        let name = self
            .current_class
            .as_deref()
            .ok_or_else(|| ApiGenError::Structure(format!("{} outside of a class", what)))?;
        self.model
            .class_mut(name)
            .ok_or_else(|| ApiGenError::Structure(format!("class {} vanished from the model", name)))
    }
}

impl SignatureSink for ParserState<'_> {
    fn add_package(&mut self, name: &str) -> Result<()> {
        self.current_class = None;
        self.current_package = Some(name.to_string());
        self.counts.packages += 1;
        Ok(())
    }

    fn add_class(&mut self, name: &str) -> Result<()> {
        let package = self
            .current_package
            .as_deref()
            .ok_or_else(|| ApiGenError::Structure(format!("class {} outside of a package", name)))?;

        let fqcn = canonical_class_name(&format!("{}.{}", package, name));
        trace!("class {} at level {}", fqcn, self.level);
        self.model.get_or_create_class(&fqcn, self.level);
        self.current_class = Some(fqcn);
        self.counts.classes += 1;
        Ok(())
    }

    fn add_super_class(&mut self, name: &str) -> Result<()> {
        let level = self.level;
        self.current_class("superclass")?
            .add_super_class(canonical_class_name(name), level);
        Ok(())
    }

    fn add_interface(&mut self, name: &str) -> Result<()> {
        let level = self.level;
        self.current_class("interface")?
            .add_interface(canonical_class_name(name), level);
        Ok(())
    }

    fn finish_method(&mut self, method: MethodBuilder) -> Result<()> {
        let level = self.level;
        self.current_class("method")?.add_method(method.finish(), level);
        self.counts.methods += 1;
        Ok(())
    }

    fn add_field(&mut self, name: &str, value: Option<&str>) -> Result<()> {
        let level = self.level;
        self.current_class("field")?
            .add_field(name, level, value.map(str::to_string));
        self.counts.fields += 1;
        Ok(())
    }

    fn finish_class(&mut self) {
        self.current_class = None;
    }

    fn finish_package(&mut self) {
        self.finish_class();
        self.current_package = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_builder() {
        let mut method = MethodBuilder::method("setText", Some("void"));
        method.add_method_parameter("java.lang.CharSequence");
        method.add_method_parameter("int...");
        assert_eq!(method.finish(), "setText(Ljava/lang/CharSequence;[I)V");

        let mut ctor = MethodBuilder::constructor();
        ctor.add_method_parameter("android.content.Context");
        assert_eq!(ctor.finish(), "<init>(Landroid/content/Context;)V");

        assert_eq!(MethodBuilder::method("legacy", None).finish(), "legacy()");
    }

    #[test]
    fn test_state_builds_class() {
        let mut model = ApiModel::new();
        let mut state = ParserState::new(&mut model, 3);

        state.add_package("android.view").unwrap();
        state.add_class("View.OnClickListener").unwrap();
        state.add_super_class("java.lang.Object").unwrap();
        state.add_interface("android.view.View.OnLongClickListener").unwrap();
        let mut method = state.start_new_method("onClick", Some("void"));
        method.add_method_parameter("android.view.View");
        state.finish_method(method).unwrap();
        state.add_field("ID", Some("1")).unwrap();
        state.finish_class();
        state.finish_package();

        assert_eq!(
            state.counts(),
            DeclarationCounts { packages: 1, classes: 1, methods: 1, fields: 1 }
        );

        let class = model.class("android/view/View$OnClickListener").unwrap();
        assert_eq!(class.since, 3);
        assert_eq!(class.super_class_since("java/lang/Object"), Some(3));
        assert_eq!(class.interface_since("android/view/View$OnLongClickListener"), Some(3));
        assert_eq!(class.method_since("onClick(Landroid/view/View;)V"), Some(3));
        assert_eq!(class.field("ID").unwrap().value.as_deref(), Some("1"));
    }

    #[test]
    fn test_members_need_a_class() {
        let mut model = ApiModel::new();
        let mut state = ParserState::new(&mut model, 1);

        assert!(matches!(state.add_class("View"), Err(ApiGenError::Structure(_))));

        state.add_package("android.view").unwrap();
        assert!(matches!(state.add_field("x", None), Err(ApiGenError::Structure(_))));

        let ctor = state.start_new_constructor();
        assert!(matches!(state.finish_method(ctor), Err(ApiGenError::Structure(_))));
    }
}
