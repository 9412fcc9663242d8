//! CLI commands for the API generator
//!
//! Turns positional arguments and option overrides into a generator run.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use r_droid_apigen_core::{ApiGenError, GeneratorConfig, OutputFormat, ParseErrorPolicy};
use tracing::info;

use crate::generator::{GenerationReport, Generator};

/// Usage line printed for malformed invocations
pub const USAGE: &str = "apigen [enum] FOLDER OUTFILE";

/// What the positional arguments ask for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    /// `FOLDER OUTFILE`: merge the level files in `FOLDER`
    Generate {
        /// Folder holding `N.xml` / `N.txt`
        api_dir: PathBuf,
        /// Database to write
        output: PathBuf,
    },
    /// `enum JAR OUTFILE`: extract enum classes from a platform jar
    EnumFromJar {
        /// Platform jar
        jar: PathBuf,
        /// Database to write
        output: PathBuf,
    },
}

impl Invocation {
    /// Interpret the positional arguments
    pub fn from_args(args: &[String]) -> Result<Self> {
        match args {
            [api_dir, output] => Ok(Invocation::Generate {
                api_dir: PathBuf::from(api_dir),
                output: PathBuf::from(output),
            }),
            [mode, jar, output] if mode == "enum" => Ok(Invocation::EnumFromJar {
                jar: PathBuf::from(jar),
                output: PathBuf::from(output),
            }),
            _ => bail!("Usage: {}", USAGE),
        }
    }
}

/// Generate command options
#[derive(Debug, Clone, Default)]
pub struct GenerateCommand {
    /// Folder holding the level files
    pub api_dir: PathBuf,
    /// Database to write
    pub output: PathBuf,
    /// TOML configuration file; the default location is used when absent
    pub config: Option<PathBuf>,
    /// Seed database merged before the first level
    pub seed: Option<PathBuf>,
    /// Output format override
    pub format: Option<OutputFormat>,
    /// Keep going past unparseable levels
    pub skip_bad_levels: bool,
}

impl GenerateCommand {
    /// Load the configuration and apply the command's overrides
    pub async fn resolve_config(&self) -> Result<GeneratorConfig> {
        let mut config = match self.config {
            Some(ref path) => GeneratorConfig::load(path)
                .await
                .with_context(|| format!("Failed to load configuration {:?}", path))?,
            None => GeneratorConfig::load_default().await?,
        };

        config.input.api_dir = self.api_dir.clone();
        config.output.path = self.output.clone();
        if let Some(ref seed) = self.seed {
            config.input.seed = Some(seed.clone());
        }
        if let Some(format) = self.format {
            config.output.format = format;
        }
        if self.skip_bad_levels {
            config.input.on_parse_error = ParseErrorPolicy::Skip;
        }

        config.validate()?;
        Ok(config)
    }

    /// Execute the generate command
    pub async fn execute(&self) -> Result<GenerationReport> {
        let config = self.resolve_config().await?;
        self.execute_with(config).await
    }

    /// Execute with an already resolved configuration
    pub async fn execute_with(&self, config: GeneratorConfig) -> Result<GenerationReport> {
        info!("Generating API database from {:?}", config.input.api_dir);

        let report = Generator::new(config)
            .run()
            .await
            .with_context(|| format!("Failed to generate {:?}", self.output))?;

        Ok(report)
    }
}

/// Enum extraction command
pub struct EnumCommand {
    /// Platform jar
    pub jar: PathBuf,
    /// Database to write
    pub output: PathBuf,
}

impl EnumCommand {
    /// Always fails; class files are not read
    pub async fn execute(&self) -> Result<()> {
        Err(ApiGenError::Unsupported(format!(
            "enum extraction from a platform jar is not supported ({:?})",
            self.jar
        ))
        .into())
    }
}

/// Print a run summary to stdout
pub fn print_report(report: &GenerationReport) {
    let stats = &report.stats;
    if let Some(ref output) = report.output {
        println!("Wrote {}", output.display());
    }
    println!(
        "  {} levels, {} classes, {} methods, {} fields",
        report.levels.len(),
        stats.classes,
        stats.methods,
        stats.fields
    );
    if report.seed_classes > 0 {
        println!("  {} classes from seed", report.seed_classes);
    }
    for level in report.skipped_levels() {
        println!("  level {} skipped", level);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_invocation_forms() {
        assert_eq!(
            Invocation::from_args(&args(&["api", "out.xml"])).unwrap(),
            Invocation::Generate {
                api_dir: PathBuf::from("api"),
                output: PathBuf::from("out.xml"),
            }
        );
        assert_eq!(
            Invocation::from_args(&args(&["enum", "android.jar", "out.xml"])).unwrap(),
            Invocation::EnumFromJar {
                jar: PathBuf::from("android.jar"),
                output: PathBuf::from("out.xml"),
            }
        );
    }

    #[test]
    fn test_bad_invocations() {
        assert!(Invocation::from_args(&args(&["api"])).is_err());
        assert!(Invocation::from_args(&args(&["jar", "android.jar", "out.xml"])).is_err());
        assert!(Invocation::from_args(&args(&["a", "b", "c", "d"])).is_err());
    }

    #[tokio::test]
    async fn test_overrides_apply_on_top_of_config_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let config_path = dir.path().join("apigen.toml");
        let mut file_config = GeneratorConfig::default();
        file_config.output.indent = 2;
        file_config.input.prefer_xml = false;
        file_config.save(&config_path).await.unwrap();

        let command = GenerateCommand {
            api_dir: dir.path().to_path_buf(),
            output: dir.path().join("out.json"),
            config: Some(config_path),
            seed: Some(dir.path().join("enums.xml")),
            format: Some(OutputFormat::Json),
            skip_bad_levels: true,
        };
        let config = command.resolve_config().await.unwrap();

        assert_eq!(config.output.indent, 2);
        assert!(!config.input.prefer_xml);
        assert_eq!(config.output.format, OutputFormat::Json);
        assert_eq!(config.input.on_parse_error, ParseErrorPolicy::Skip);
        assert_eq!(config.input.seed, Some(dir.path().join("enums.xml")));
    }

    #[tokio::test]
    async fn test_enum_is_unsupported() {
        let command = EnumCommand {
            jar: PathBuf::from("android.jar"),
            output: PathBuf::from("out.xml"),
        };
        let err = command.execute().await.unwrap_err();
        assert!(err.to_string().contains("not supported"));
    }
}
