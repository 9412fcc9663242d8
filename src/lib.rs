//! R-Droid API Generator
//!
//! Builds the versioned API database used by lint checks: for every public
//! class, superclass link, interface, method and field of the Android
//! platform, the first API level that introduced it.
//!
//! ## Architecture
//!
//! The generator is organized into specialized crates:
//!
//! - `r-droid-apigen-core`: errors, configuration and level-file discovery
//! - `r-droid-api-model`: the since-annotated model with its XML writer and reader
//! - `r-droid-signature-parser`: text and XML signature file parsers
//!
//! This crate holds the driver that walks an API folder level by level and
//! the command line front end.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod commands;
pub mod generator;

// Re-export main components for library usage
pub use r_droid_api_model as model;
pub use r_droid_apigen_core as core;
pub use r_droid_signature_parser as parser;

pub use generator::{GenerationReport, Generator, LevelReport, LevelStatus};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::generator::{GenerationReport, Generator};
    pub use r_droid_api_model::{ApiClass, ApiModel, ApiReader, ApiWriter};
    pub use r_droid_apigen_core::{ApiGenError, GeneratorConfig, OutputFormat, ParseErrorPolicy};
    pub use r_droid_signature_parser::{ParserState, SignatureSink, TextApiParser, XmlApiParser};
}
