//! API Database Writer
//!
//! Writes the merged model as the versioned API XML file (or JSON).

use std::collections::BTreeMap;
use std::io::Cursor;
use std::path::Path;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::Writer;
use r_droid_apigen_core::{OutputFormat, Result};
use tracing::info;

use crate::class::ApiClass;
use crate::element::ApiElement;
use crate::model::ApiModel;

/// Version written on the root element
pub const API_FILE_VERSION: &str = "1";

pub(crate) const NODE_API: &str = "api";
pub(crate) const NODE_CLASS: &str = "class";
pub(crate) const NODE_EXTENDS: &str = "extends";
pub(crate) const NODE_IMPLEMENTS: &str = "implements";
pub(crate) const NODE_METHOD: &str = "method";
pub(crate) const NODE_FIELD: &str = "field";

pub(crate) const ATTR_VERSION: &str = "version";
pub(crate) const ATTR_NAME: &str = "name";
pub(crate) const ATTR_SINCE: &str = "since";
pub(crate) const ATTR_VALUE: &str = "value";

/// API database writer
pub struct ApiWriter {
    indent: usize,
}

impl ApiWriter {
    /// Create a new writer with default settings
    pub fn new() -> Self {
        Self { indent: 4 }
    }

    /// Set indentation
    pub fn with_indent(mut self, spaces: usize) -> Self {
        self.indent = spaces;
        self
    }

    /// Write the model as XML.
    ///
    /// Classes and members come out in name order, so the same model always
    /// produces the same bytes.
    pub fn write_to_string(&self, model: &ApiModel) -> Result<String> {
        let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', self.indent);

        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;

        let mut api = BytesStart::new(NODE_API);
        api.push_attribute((ATTR_VERSION, API_FILE_VERSION));
        writer.write_event(Event::Start(api))?;

        for class in model.classes() {
            self.write_class(&mut writer, class)?;
        }

        writer.write_event(Event::End(BytesEnd::new(NODE_API)))?;

        let result = writer.into_inner().into_inner();
        let mut xml = String::from_utf8_lossy(&result).into_owned();
        xml.push('\n');
        Ok(xml)
    }

    /// Write the model as pretty JSON
    pub fn write_json_to_string(&self, model: &ApiModel) -> Result<String> {
        let mut json = serde_json::to_string_pretty(model)?;
        json.push('\n');
        Ok(json)
    }

    /// Write the model to a file in the given format
    pub async fn write_to_file(
        &self,
        model: &ApiModel,
        path: impl AsRef<Path>,
        format: OutputFormat,
    ) -> Result<()> {
        let content = match format {
            OutputFormat::Xml => self.write_to_string(model)?,
            OutputFormat::Json => self.write_json_to_string(model)?,
        };
        tokio::fs::write(path.as_ref(), content).await?;
        info!("Wrote {} classes to {:?}", model.len(), path.as_ref());
        Ok(())
    }

    fn write_class<W: std::io::Write>(&self, writer: &mut Writer<W>, class: &ApiClass) -> Result<()> {
        let mut elem = BytesStart::new(NODE_CLASS);
        elem.push_attribute((ATTR_NAME, class.name.as_str()));
        elem.push_attribute((ATTR_SINCE, class.since.to_string().as_str()));

        if class.member_count() == 0 {
            writer.write_event(Event::Empty(elem))?;
            return Ok(());
        }

        writer.write_event(Event::Start(elem))?;

        self.write_elements(writer, NODE_EXTENDS, &class.super_classes, class.since)?;
        self.write_elements(writer, NODE_IMPLEMENTS, &class.interfaces, class.since)?;
        self.write_elements(writer, NODE_METHOD, &class.methods, class.since)?;

        for field in class.fields.values() {
            let mut elem = self.member_start(NODE_FIELD, &field.element, class.since);
            if let Some(ref value) = field.value {
                elem.push_attribute((ATTR_VALUE, value.as_str()));
            }
            writer.write_event(Event::Empty(elem))?;
        }

        writer.write_event(Event::End(BytesEnd::new(NODE_CLASS)))?;
        Ok(())
    }

    fn write_elements<W: std::io::Write>(
        &self,
        writer: &mut Writer<W>,
        tag: &'static str,
        elements: &BTreeMap<String, ApiElement>,
        class_since: u32,
    ) -> Result<()> {
        for element in elements.values() {
            writer.write_event(Event::Empty(self.member_start(tag, element, class_since)))?;
        }
        Ok(())
    }

    /// Members only carry `since` when it differs from their class
    fn member_start(&self, tag: &'static str, element: &ApiElement, class_since: u32) -> BytesStart<'static> {
        let mut elem = BytesStart::new(tag);
        elem.push_attribute((ATTR_NAME, element.name.as_str()));
        if element.since != class_since {
            elem.push_attribute((ATTR_SINCE, element.since.to_string().as_str()));
        }
        elem
    }
}

impl Default for ApiWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_model() -> ApiModel {
        let mut model = ApiModel::new();
        let view = model.get_or_create_class("android/view/View", 1);
        view.add_super_class("java/lang/Object", 1);
        view.add_interface("android/graphics/drawable/Drawable$Callback", 2);
        view.add_method("<init>(Landroid/content/Context;)V", 1);
        view.add_method("draw(Landroid/graphics/Canvas;)V", 3);
        view.add_field("NO_ID", 1, Some("-1".into()));
        model.get_or_create_class("android/view/ViewDebug$ExportedProperty", 1);
        model
    }

    #[test]
    fn test_write_basic_model() {
        let xml = ApiWriter::new().write_to_string(&sample_model()).unwrap();

        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"utf-8\"?>"));
        assert!(xml.contains("<api version=\"1\">"));
        assert!(xml.contains("<class name=\"android/view/View\" since=\"1\">"));
        assert!(xml.contains("<extends name=\"java/lang/Object\"/>"));
        assert!(xml.contains("<implements name=\"android/graphics/drawable/Drawable$Callback\" since=\"2\"/>"));
        assert!(xml.contains("<method name=\"&lt;init&gt;(Landroid/content/Context;)V\"/>"));
        assert!(xml.contains("<method name=\"draw(Landroid/graphics/Canvas;)V\" since=\"3\"/>"));
        assert!(xml.contains("<field name=\"NO_ID\" value=\"-1\"/>"));
        assert!(xml.contains("<class name=\"android/view/ViewDebug$ExportedProperty\" since=\"1\"/>"));
        assert!(xml.trim_end().ends_with("</api>"));
    }

    #[test]
    fn test_classes_written_in_name_order() {
        let xml = ApiWriter::new().write_to_string(&sample_model()).unwrap();
        let view = xml.find("android/view/View\"").unwrap();
        let debug = xml.find("android/view/ViewDebug$ExportedProperty").unwrap();
        assert!(view < debug);
    }

    #[test]
    fn test_output_is_stable() {
        let model = sample_model();
        let writer = ApiWriter::new();
        assert_eq!(
            writer.write_to_string(&model).unwrap(),
            writer.write_to_string(&model.clone()).unwrap()
        );
    }

    #[test]
    fn test_write_json() {
        let json = ApiWriter::new().write_json_to_string(&sample_model()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        let view = &value["classes"]["android/view/View"];
        assert_eq!(view["since"], 1);
        assert_eq!(view["methods"]["draw(Landroid/graphics/Canvas;)"]["since"], 3);
        assert_eq!(view["fields"]["NO_ID"]["value"], "-1");
    }
}
