//! R-Droid API generator core - shared types
//!
//! Errors, configuration and level-file discovery used by the model,
//! the signature parsers and the driver.

pub mod config;
pub mod error;
pub mod level;
pub mod xml;

pub use config::{GeneratorConfig, InputConfig, LoggingConfig, OutputConfig, OutputFormat, ParseErrorPolicy};
pub use error::{ApiGenError, ParseError, Result};
pub use level::{LevelFile, SignatureFormat};

/// Generator version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Tool name
pub const TOOL_NAME: &str = "R-Droid API Generator";
