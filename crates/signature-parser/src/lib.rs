//! Platform Signature Parsers
//!
//! Reads per-level platform API descriptions, in either the text or the XML
//! signature format, and merges them into an [`ApiModel`] through
//! [`ParserState`].

pub mod descriptor;
pub mod state;
pub mod text_parser;
pub mod tokenizer;
pub mod xml_parser;

pub use descriptor::{canonical_class_name, encode_type};
pub use state::{DeclarationCounts, MethodBuilder, ParserState, SignatureSink};
pub use text_parser::TextApiParser;
pub use tokenizer::{ParenMode, Tokenizer};
pub use xml_parser::XmlApiParser;

use r_droid_api_model::ApiModel;
use r_droid_apigen_core::{Result, SignatureFormat};

/// Parse one signature file into `sink`, dispatching on its format
pub fn parse_signatures<S>(format: SignatureFormat, file: &str, text: &str, sink: &mut S) -> Result<()>
where
    S: SignatureSink + ?Sized,
{
    match format {
        SignatureFormat::Text => TextApiParser::parse(file, text, sink),
        SignatureFormat::Xml => XmlApiParser::parse(file, text, sink),
    }
}

/// Merge one level's signature file into `model`
pub fn merge_level(
    model: &mut ApiModel,
    level: u32,
    format: SignatureFormat,
    file: &str,
    text: &str,
) -> Result<DeclarationCounts> {
    let mut state = ParserState::new(model, level);
    parse_signatures(format, file, text, &mut state)?;
    Ok(state.counts())
}
