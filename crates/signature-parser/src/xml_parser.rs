//! XML signature parser
//!
//! Reads the `N.xml` form of a platform API description with the quick-xml
//! event reader and reports declarations to a [`SignatureSink`].

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use r_droid_apigen_core::xml::{attribute, element_name, line_at, required_attribute};
use r_droid_apigen_core::{ApiGenError, ParseError, Result};
use tracing::debug;

use crate::state::{MethodBuilder, SignatureSink};

const NODE_API: &[u8] = b"api";
const NODE_PACKAGE: &[u8] = b"package";
const NODE_CLASS: &[u8] = b"class";
const NODE_INTERFACE: &[u8] = b"interface";
const NODE_IMPLEMENTS: &[u8] = b"implements";
const NODE_FIELD: &[u8] = b"field";
const NODE_CONSTRUCTOR: &[u8] = b"constructor";
const NODE_METHOD: &[u8] = b"method";
const NODE_PARAMETER: &[u8] = b"parameter";

const ATTR_NAME: &str = "name";
const ATTR_TYPE: &str = "type";
const ATTR_RETURN: &str = "return";
const ATTR_EXTENDS: &str = "extends";
const ATTR_VALUE: &str = "value";

/// XML signature file parser
pub struct XmlApiParser;

impl XmlApiParser {
    /// Parse one XML signature file, reporting declarations to `sink`
    pub fn parse<S>(file: &str, xml: &str, sink: &mut S) -> Result<()>
    where
        S: SignatureSink + ?Sized,
    {
        Self::parse_events(xml, sink).map_err(|e| e.in_file(file))?;
        debug!("Parsed {}", file);
        Ok(())
    }

    fn parse_events<S>(xml: &str, sink: &mut S) -> Result<()>
    where
        S: SignatureSink + ?Sized,
    {
        let mut reader = Reader::from_str(xml);
        reader.trim_text(true);

        let mut handler = Handler { sink, method: None };
        let mut buf = Vec::new();
        let mut depth = 0usize;

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) => {
                    depth += 1;
                    handler
                        .start(e)
                        .map_err(|err| err.at_line(line_at(xml, reader.buffer_position())))?;
                }
                Ok(Event::Empty(ref e)) => {
                    let line = line_at(xml, reader.buffer_position());
                    handler.start(e).map_err(|err| err.at_line(line))?;
                    handler
                        .end(e.name().as_ref())
                        .map_err(|err| err.at_line(line))?;
                }
                Ok(Event::End(ref e)) => {
                    depth = depth.saturating_sub(1);
                    handler
                        .end(e.name().as_ref())
                        .map_err(|err| err.at_line(line_at(xml, reader.buffer_position())))?;
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

        Ok(())
    }
}

/// Element callbacks; holds the method under construction
struct Handler<'s, S: ?Sized> {
    sink: &'s mut S,
    method: Option<MethodBuilder>,
}

impl<S: SignatureSink + ?Sized> Handler<'_, S> {
    fn start(&mut self, e: &BytesStart) -> Result<()> {
        match e.name().as_ref() {
            NODE_API => {}
            NODE_PACKAGE => {
                self.sink.add_package(&required_attribute(e, ATTR_NAME)?)?;
            }
            NODE_CLASS | NODE_INTERFACE => {
                self.sink.add_class(&required_attribute(e, ATTR_NAME)?)?;
                if let Some(super_class) = attribute(e, ATTR_EXTENDS)? {
                    self.sink.add_super_class(&super_class)?;
                }
            }
            NODE_IMPLEMENTS => {
                self.sink.add_interface(&required_attribute(e, ATTR_NAME)?)?;
            }
            NODE_FIELD => {
                let name = required_attribute(e, ATTR_NAME)?;
                let value = attribute(e, ATTR_VALUE)?;
                self.sink.add_field(&name, value.as_deref())?;
            }
            NODE_CONSTRUCTOR => {
                let method = self.sink.start_new_constructor();
                self.open_method(e, method)?;
            }
            NODE_METHOD => {
                let name = required_attribute(e, ATTR_NAME)?;
                let return_type = attribute(e, ATTR_RETURN)?;
                let method = self.sink.start_new_method(&name, return_type.as_deref());
                self.open_method(e, method)?;
            }
            NODE_PARAMETER => {
                let type_name = required_attribute(e, ATTR_TYPE)?;
                let method = self.method.as_mut().ok_or_else(|| {
                    ApiGenError::Structure("<parameter> outside of a method".to_string())
                })?;
                method.add_method_parameter(&type_name);
            }
            _ => {}
        }
        Ok(())
    }

    fn end(&mut self, name: &[u8]) -> Result<()> {
        match name {
            NODE_CONSTRUCTOR | NODE_METHOD => {
                if let Some(method) = self.method.take() {
                    self.sink.finish_method(method)?;
                }
            }
            NODE_CLASS | NODE_INTERFACE => self.sink.finish_class(),
            NODE_PACKAGE => self.sink.finish_package(),
            NODE_API => self.sink.done(),
            _ => {}
        }
        Ok(())
    }

    fn open_method(&mut self, e: &BytesStart, method: MethodBuilder) -> Result<()> {
        if self.method.is_some() {
            return Err(ApiGenError::Structure(format!(
                "<{}> inside another method",
                element_name(e)
            )));
        }
        self.method = Some(method);
        Ok(())
    }
}
