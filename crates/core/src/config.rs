//! Generator Configuration
//!
//! Settings for one generator run:
//! - Input folder, first level and seed file
//! - Output path and format
//! - Parse failure policy
//! - Logging

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{ApiGenError, Result};

/// Output format for the merged API database
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Xml,
    Json,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Xml => "xml",
            OutputFormat::Json => "json",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "xml" => Some(OutputFormat::Xml),
            "json" => Some(OutputFormat::Json),
            _ => None,
        }
    }
}

/// What to do when one level's file fails to parse
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ParseErrorPolicy {
    /// Abort the whole run
    #[default]
    Fail,
    /// Drop the level, warn, and report it as skipped
    Skip,
}

/// Input settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Folder holding `1.xml`/`1.txt`, `2.xml`/`2.txt`, ...
    pub api_dir: PathBuf,
    /// First level to look for
    pub first_level: u32,
    /// Take `N.xml` over `N.txt` when both exist
    pub prefer_xml: bool,
    /// Merged-format file loaded before the first level (usually `enums.xml`)
    pub seed: Option<PathBuf>,
    /// Parse failure policy
    pub on_parse_error: ParseErrorPolicy,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            api_dir: PathBuf::from("."),
            first_level: 1,
            prefer_xml: true,
            seed: None,
            on_parse_error: ParseErrorPolicy::Fail,
        }
    }
}

/// Output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Output file
    pub path: PathBuf,
    /// Output format
    pub format: OutputFormat,
    /// Indentation width for XML output
    pub indent: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("api-versions.xml"),
            format: OutputFormat::Xml,
            indent: 4,
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default level filter (overridden by `RUST_LOG`)
    pub level: String,
    /// Include source file and line in log lines
    pub with_file: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            with_file: false,
        }
    }
}

/// Main generator configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub input: InputConfig,
    pub output: OutputConfig,
    pub logging: LoggingConfig,
}

impl GeneratorConfig {
    /// Config for the plain `FOLDER OUTFILE` invocation
    pub fn new(api_dir: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        let mut config = Self::default();
        config.input.api_dir = api_dir.into();
        config.output.path = output.into();
        config
    }

    /// Get the configuration directory path
    pub fn config_dir() -> Option<PathBuf> {
        ProjectDirs::from("com", "rdroid", "R-Droid").map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Get the default configuration file path
    pub fn config_file() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("apigen.toml"))
    }

    /// Load the default configuration file, or defaults if there is none
    pub async fn load_default() -> Result<Self> {
        match Self::config_file() {
            Some(file) if file.exists() => Self::load(&file).await,
            _ => {
                debug!("No apigen.toml found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Load configuration from a TOML file
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading configuration from {:?}", path);
        let contents = tokio::fs::read_to_string(path).await?;
        let config: GeneratorConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let contents = toml::to_string_pretty(self)?;
        tokio::fs::write(path, contents).await?;

        debug!("Config saved to {:?}", path);
        Ok(())
    }

    /// Reject settings no run could succeed with
    pub fn validate(&self) -> Result<()> {
        if self.input.first_level == 0 {
            return Err(ApiGenError::Config("first_level must be at least 1".into()));
        }
        if self.output.path.as_os_str().is_empty() {
            return Err(ApiGenError::Config("output path is empty".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GeneratorConfig::default();
        assert_eq!(config.input.first_level, 1);
        assert!(config.input.prefer_xml);
        assert_eq!(config.input.on_parse_error, ParseErrorPolicy::Fail);
        assert_eq!(config.output.format, OutputFormat::Xml);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: GeneratorConfig = toml::from_str(
            r#"
            [input]
            api_dir = "platforms/api"
            on_parse_error = "skip"

            [output]
            format = "json"
            "#,
        )
        .unwrap();

        assert_eq!(config.input.api_dir, PathBuf::from("platforms/api"));
        assert_eq!(config.input.on_parse_error, ParseErrorPolicy::Skip);
        assert_eq!(config.input.first_level, 1);
        assert_eq!(config.output.format, OutputFormat::Json);
        assert_eq!(config.output.indent, 4);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_validate_rejects_level_zero() {
        let mut config = GeneratorConfig::default();
        config.input.first_level = 0;
        assert!(matches!(config.validate(), Err(ApiGenError::Config(_))));
    }

    #[test]
    fn test_output_format_names() {
        assert_eq!(OutputFormat::from_name("JSON"), Some(OutputFormat::Json));
        assert_eq!(OutputFormat::from_name("xml"), Some(OutputFormat::Xml));
        assert_eq!(OutputFormat::from_name("yaml"), None);
        assert_eq!(OutputFormat::Json.as_str(), "json");
    }

    #[tokio::test]
    async fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("conf").join("apigen.toml");

        let mut config = GeneratorConfig::new("api", "out.xml");
        config.input.seed = Some(PathBuf::from("enums.xml"));
        config.save(&path).await.unwrap();

        let loaded = GeneratorConfig::load(&path).await.unwrap();
        assert_eq!(loaded.input.api_dir, PathBuf::from("api"));
        assert_eq!(loaded.input.seed, Some(PathBuf::from("enums.xml")));
        assert_eq!(loaded.output.path, PathBuf::from("out.xml"));
    }
}
