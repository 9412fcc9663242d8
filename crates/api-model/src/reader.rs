//! API Database Reader
//!
//! Parses the versioned API XML file written by [`crate::ApiWriter`]. This is
//! also the format of the seed file merged in before the first level.

use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use r_droid_apigen_core::xml::{attribute, element_name, level_attribute, line_at, required_attribute};
use r_droid_apigen_core::{ApiGenError, ParseError, Result};
use tracing::debug;

use crate::model::ApiModel;
use crate::writer::{
    ATTR_NAME, ATTR_SINCE, ATTR_VALUE, NODE_API, NODE_CLASS, NODE_EXTENDS, NODE_FIELD,
    NODE_IMPLEMENTS, NODE_METHOD,
};

/// API database reader
pub struct ApiReader;

impl ApiReader {
    /// Parse an API database file
    pub async fn parse_file(path: impl AsRef<Path>) -> Result<ApiModel> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await?;
        let file = path.display().to_string();
        Self::parse_string(&content).map_err(|e| e.in_file(&file))
    }

    /// Parse an API database from a string
    pub fn parse_string(xml: &str) -> Result<ApiModel> {
        let mut model = ApiModel::new();
        Self::parse_into(xml, &mut model)?;
        Ok(model)
    }

    /// Merge an API database into an existing model
    pub fn parse_into(xml: &str, model: &mut ApiModel) -> Result<()> {
        let mut reader = Reader::from_str(xml);
        reader.trim_text(true);

        let mut buf = Vec::new();
        let mut depth = 0usize;
        let mut current_class: Option<String> = None;

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) => {
                    depth += 1;
                    Self::start_element(model, &mut current_class, e)
                        .map_err(|err| err.at_line(line_at(xml, reader.buffer_position())))?;
                }
                Ok(Event::Empty(ref e)) => {
                    Self::start_element(model, &mut current_class, e)
                        .map_err(|err| err.at_line(line_at(xml, reader.buffer_position())))?;
                    if e.name().as_ref() == NODE_CLASS.as_bytes() {
                        current_class = None;
                    }
                }
                Ok(Event::End(ref e)) => {
                    depth = depth.saturating_sub(1);
                    if e.name().as_ref() == NODE_CLASS.as_bytes() {
                        current_class = None;
                    }
                }
                Ok(Event::Eof) => {
                    if depth > 0 {
                        return Err(ParseError::unexpected_eof(line_at(xml, xml.len())).into());
                    }
                    break;
                }
                Err(e) => {
                    let line = line_at(xml, reader.buffer_position());
                    return Err(ApiGenError::from(e).at_line(line));
                }
                _ => {}
            }
            buf.clear();
        }

        debug!("Read {} classes from API database", model.len());
        Ok(())
    }

    fn start_element(
        model: &mut ApiModel,
        current_class: &mut Option<String>,
        e: &BytesStart,
    ) -> Result<()> {
        let name = e.name();
        let tag = name.as_ref();

        if tag == NODE_API.as_bytes() {
            return Ok(());
        }

        if tag == NODE_CLASS.as_bytes() {
            let class_name = required_attribute(e, ATTR_NAME)?;
            let since = level_attribute(e, ATTR_SINCE)?.ok_or_else(|| {
                ApiGenError::Structure(format!("missing attribute 'since' on class {}", class_name))
            })?;
            model.get_or_create_class(&class_name, since);
            *current_class = Some(class_name);
            return Ok(());
        }

        let class_name = current_class.as_deref().ok_or_else(|| {
            ApiGenError::Structure(format!("<{}> outside of a class", element_name(e)))
        })?;
        let class = model
            .class_mut(class_name)
            .ok_or_else(|| ApiGenError::Structure(format!("unknown class {}", class_name)))?;

        let member = required_attribute(e, ATTR_NAME)?;
        let since = level_attribute(e, ATTR_SINCE)?.unwrap_or(class.since);

        if tag == NODE_EXTENDS.as_bytes() {
            class.add_super_class(member, since);
        } else if tag == NODE_IMPLEMENTS.as_bytes() {
            class.add_interface(member, since);
        } else if tag == NODE_METHOD.as_bytes() {
            class.add_method(member, since);
        } else if tag == NODE_FIELD.as_bytes() {
            class.add_field(member, since, attribute(e, ATTR_VALUE)?);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::writer::ApiWriter;

    const SAMPLE_API: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<api version="1">
    <class name="android/os/AsyncTask$Status" since="3">
        <extends name="java/lang/Enum"/>
        <method name="valueOf(Ljava/lang/String;)Landroid/os/AsyncTask$Status;"/>
        <field name="FINISHED"/>
        <field name="PENDING" since="5"/>
    </class>
    <class name="android/view/ViewDebug$HierarchyTraceType" since="1"/>
</api>"#;

    #[test]
    fn test_parse_api_database() {
        let model = ApiReader::parse_string(SAMPLE_API).unwrap();

        assert_eq!(model.len(), 2);
        let status = model.class("android/os/AsyncTask$Status").unwrap();
        assert_eq!(status.since, 3);
        assert_eq!(status.super_class_since("java/lang/Enum"), Some(3));
        assert_eq!(status.method_since("valueOf(Ljava/lang/String;)"), Some(3));
        assert_eq!(status.field_since("FINISHED"), Some(3));
        assert_eq!(status.field_since("PENDING"), Some(5));
        assert!(model.class("android/view/ViewDebug$HierarchyTraceType").is_some());
    }

    #[test]
    fn test_roundtrip() {
        let mut model = ApiModel::new();
        let view = model.get_or_create_class("android/view/View", 1);
        view.add_super_class("java/lang/Object", 1);
        view.add_interface("android/view/KeyEvent$Callback", 2);
        view.add_method("<init>(Landroid/content/Context;)V", 1);
        view.add_method("draw(Landroid/graphics/Canvas;)V", 4);
        view.add_field("NO_ID", 1, Some("-1".into()));
        model.get_or_create_class("android/view/Menu", 1);

        let xml = ApiWriter::new().write_to_string(&model).unwrap();
        let parsed = ApiReader::parse_string(&xml).unwrap();

        assert_eq!(parsed, model);
    }

    #[tokio::test]
    async fn test_file_roundtrip() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("api-versions.xml");
        let model = ApiReader::parse_string(SAMPLE_API).unwrap();

        ApiWriter::new()
            .write_to_file(&model, &path, r_droid_apigen_core::OutputFormat::Xml)
            .await
            .unwrap();

        assert_eq!(ApiReader::parse_file(&path).await.unwrap(), model);
    }

    #[tokio::test]
    async fn test_parse_file_names_the_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("enums.xml");
        std::fs::write(&path, "<api version=\"1\">\n<field name=\"X\"/>\n</api>\n").unwrap();

        match ApiReader::parse_file(&path).await {
            Err(ApiGenError::Parse(e)) => {
                assert!(e.file.unwrap().ends_with("enums.xml"));
                assert_eq!(e.line, 2);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_member_outside_class_is_rejected() {
        let xml = "<api version=\"1\">\n<method name=\"foo()V\"/>\n</api>";
        match ApiReader::parse_string(xml) {
            Err(ApiGenError::Parse(e)) => assert_eq!(e.line, 2),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_truncated_file_is_rejected() {
        let truncated = &SAMPLE_API[..SAMPLE_API.find("</class>").unwrap()];
        assert!(matches!(ApiReader::parse_string(truncated), Err(ApiGenError::Parse(_))));
    }
}
