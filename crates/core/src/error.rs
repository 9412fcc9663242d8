//! Error types for the API level generator
//!
//! Centralized error handling using thiserror.

use std::fmt;

use thiserror::Error;

/// A lexical or syntax error in a signature file.
///
/// Carries the 1-based line where the problem was detected. The file name is
/// attached by whoever knows it (usually the driver) via [`ParseError::in_file`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// Human readable description, e.g. `expected '{' got class`
    pub message: String,
    /// 1-based input line, 0 when unknown
    pub line: usize,
    /// Name of the file being parsed
    pub file: Option<String>,
}

impl ParseError {
    /// Create an error at the given line
    pub fn new(message: impl Into<String>, line: usize) -> Self {
        Self {
            message: message.into(),
            line,
            file: None,
        }
    }

    /// Input ended while a token was still required
    pub fn unexpected_eof(line: usize) -> Self {
        Self::new("Unexpected end of file", line)
    }

    /// Attach the file name, keeping one that is already set
    pub fn in_file(mut self, file: impl Into<String>) -> Self {
        if self.file.is_none() {
            self.file = Some(file.into());
        }
        self
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref file) = self.file {
            write!(f, "{}: ", file)?;
        }
        write!(f, "{}", self.message)?;
        if self.line > 0 {
            write!(f, " line {}", self.line)?;
        }
        Ok(())
    }
}

impl std::error::Error for ParseError {}

/// Main error type for the generator
#[derive(Error, Debug)]
pub enum ApiGenError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("Invalid structure: {0}")]
    Structure(String),

    #[error("Unsupported: {0}")]
    Unsupported(String),
}

/// Result type alias for generator operations
pub type Result<T> = std::result::Result<T, ApiGenError>;

impl ApiGenError {
    /// Errors caused by the content of one input file, as opposed to the
    /// environment (IO, configuration).
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            ApiGenError::Parse(_) | ApiGenError::Structure(_)
        )
    }

    /// Attach a file name to parse errors; other variants pass through
    pub fn in_file(self, file: &str) -> Self {
        match self {
            ApiGenError::Parse(e) => ApiGenError::Parse(e.in_file(file)),
            ApiGenError::Structure(msg) => ApiGenError::Structure(format!("{}: {}", file, msg)),
            other => other,
        }
    }

    /// Pin an error raised while handling input at `line` to that line.
    ///
    /// XML library errors and structure errors become [`ParseError`]s so that
    /// both input formats report failures the same way.
    pub fn at_line(self, line: usize) -> Self {
        match self {
            ApiGenError::Xml(e) => ParseError::new(e.to_string(), line).into(),
            ApiGenError::Structure(msg) => ParseError::new(msg, line).into(),
            ApiGenError::Parse(mut e) if e.line == 0 => {
                e.line = line;
                ApiGenError::Parse(e)
            }
            other => other,
        }
    }
}
