//! quick-xml helpers shared by the XML readers

use quick_xml::events::BytesStart;

use crate::error::{ApiGenError, Result};

/// Get a non-namespaced attribute, unescaped
pub fn attribute(e: &BytesStart, name: &str) -> Result<Option<String>> {
    for attr in e.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        if attr.key.as_ref() == name.as_bytes() {
            return Ok(Some(attr.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}

/// Get an attribute that must be present
pub fn required_attribute(e: &BytesStart, name: &str) -> Result<String> {
    attribute(e, name)?.ok_or_else(|| {
        ApiGenError::Structure(format!(
            "missing attribute '{}' on <{}>",
            name,
            element_name(e)
        ))
    })
}

/// Parse an optional numeric `since`-style attribute
pub fn level_attribute(e: &BytesStart, name: &str) -> Result<Option<u32>> {
    match attribute(e, name)? {
        Some(value) => value.trim().parse().map(Some).map_err(|_| {
            ApiGenError::Structure(format!(
                "invalid {} '{}' on <{}>",
                name,
                value,
                element_name(e)
            ))
        }),
        None => Ok(None),
    }
}

/// Element name for diagnostics
pub fn element_name(e: &BytesStart) -> String {
    String::from_utf8_lossy(e.name().as_ref()).into_owned()
}

/// 1-based line of byte offset `pos` in `text`
pub fn line_at(text: &str, pos: usize) -> usize {
    let end = pos.min(text.len());
    text.as_bytes()[..end].iter().filter(|&&b| b == b'\n').count() + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_unescapes() {
        let mut e = BytesStart::new("method");
        e.push_attribute(("name", "<init>()V"));
        e.push_attribute(("since", "3"));

        assert_eq!(attribute(&e, "name").unwrap().as_deref(), Some("<init>()V"));
        assert_eq!(level_attribute(&e, "since").unwrap(), Some(3));
        assert_eq!(attribute(&e, "return").unwrap(), None);
        assert!(required_attribute(&e, "type").is_err());
    }

    #[test]
    fn test_level_attribute_rejects_garbage() {
        let mut e = BytesStart::new("class");
        e.push_attribute(("since", "ten"));
        assert!(matches!(level_attribute(&e, "since"), Err(ApiGenError::Structure(_))));
    }

    #[test]
    fn test_line_at() {
        let text = "a\nb\nc";
        assert_eq!(line_at(text, 0), 1);
        assert_eq!(line_at(text, 2), 2);
        assert_eq!(line_at(text, 100), 3);
    }
}
