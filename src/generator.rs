//! Generator driver
//!
//! Merges the optional seed database and every consecutive level file of an
//! API folder into one model, then writes the API database.

use std::path::PathBuf;

use r_droid_api_model::{ApiModel, ApiReader, ApiWriter, ModelStats};
use r_droid_apigen_core::{
    ApiGenError, GeneratorConfig, LevelFile, ParseErrorPolicy, Result, SignatureFormat,
};
use r_droid_signature_parser::{merge_level, DeclarationCounts};
use tracing::{debug, info, warn};

/// What happened to one level file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LevelStatus {
    /// Merged into the model
    Merged(DeclarationCounts),
    /// Left out of the model; the reason is for display
    Skipped {
        /// Why the level was left out
        reason: String,
    },
}

/// Outcome for one level
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelReport {
    /// API level number
    pub level: u32,
    /// File the level was read from
    pub path: PathBuf,
    /// Signature format of the file
    pub format: SignatureFormat,
    /// Merge result
    pub status: LevelStatus,
}

impl LevelReport {
    /// Whether the level was left out of the model
    pub fn is_skipped(&self) -> bool {
        matches!(self.status, LevelStatus::Skipped { .. })
    }
}

/// Summary of a generator run
#[derive(Debug, Clone, Default)]
pub struct GenerationReport {
    /// One entry per level file found, in level order
    pub levels: Vec<LevelReport>,
    /// Classes loaded from the seed database
    pub seed_classes: usize,
    /// Totals over the final model
    pub stats: ModelStats,
    /// Where the database was written, once it has been
    pub output: Option<PathBuf>,
}

impl GenerationReport {
    /// Levels that were found but not merged
    pub fn skipped_levels(&self) -> Vec<u32> {
        self.levels
            .iter()
            .filter(|l| l.is_skipped())
            .map(|l| l.level)
            .collect()
    }

    /// Highest level file found
    pub fn last_level(&self) -> Option<u32> {
        self.levels.last().map(|l| l.level)
    }

    /// True when every level found was merged
    pub fn is_complete(&self) -> bool {
        self.levels.iter().all(|l| !l.is_skipped())
    }
}

/// API database generator
pub struct Generator {
    config: GeneratorConfig,
}

impl Generator {
    /// Create a generator for a validated or default configuration
    pub fn new(config: GeneratorConfig) -> Self {
        Self { config }
    }

    /// Configuration in use
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Build the model and write the database
    pub async fn run(&self) -> Result<GenerationReport> {
        let (model, mut report) = self.build_model().await?;

        let output = &self.config.output;
        ApiWriter::new()
            .with_indent(output.indent)
            .write_to_file(&model, &output.path, output.format)
            .await?;

        report.output = Some(output.path.clone());
        Ok(report)
    }

    /// Merge the seed and all level files without writing anything
    pub async fn build_model(&self) -> Result<(ApiModel, GenerationReport)> {
        self.config.validate()?;

        let input = &self.config.input;
        if !input.api_dir.is_dir() {
            return Err(ApiGenError::Config(format!(
                "API folder {:?} is not a directory",
                input.api_dir
            )));
        }

        let mut model = ApiModel::new();
        let mut report = GenerationReport::default();

        if let Some(ref seed) = input.seed {
            let text = tokio::fs::read_to_string(seed).await?;
            ApiReader::parse_into(&text, &mut model)
                .map_err(|e| e.in_file(&seed.display().to_string()))?;
            report.seed_classes = model.len();
            info!("Seeded {} classes from {:?}", report.seed_classes, seed);
        }

        let mut level = input.first_level;
        while let Some(file) = LevelFile::locate(&input.api_dir, level, input.prefer_xml) {
            let status = self.merge_file(&mut model, &file).await?;
            report.levels.push(LevelReport {
                level,
                path: file.path,
                format: file.format,
                status,
            });
            level += 1;
        }

        if report.levels.is_empty() {
            warn!(
                "No level {} signature file in {:?}",
                input.first_level, input.api_dir
            );
        }

        report.stats = model.stats();
        info!(
            "Merged {} levels: {} classes, {} methods, {} fields",
            report.levels.len(),
            report.stats.classes,
            report.stats.methods,
            report.stats.fields
        );

        Ok((model, report))
    }

    /// Merge one level file. The level is parsed into its own model, which
    /// is folded into `model` only on success.
    async fn merge_file(&self, model: &mut ApiModel, file: &LevelFile) -> Result<LevelStatus> {
        let name = file.file_name();

        let bytes = match tokio::fs::read(&file.path).await {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("Skipping level {}: cannot read {}: {}", file.level, name, e);
                return Ok(LevelStatus::Skipped {
                    reason: e.to_string(),
                });
            }
        };
        let text = match String::from_utf8(bytes) {
            Ok(text) => text,
            Err(e) => {
                warn!("{} is not valid UTF-8; undecodable bytes were replaced", name);
                String::from_utf8_lossy(e.as_bytes()).into_owned()
            }
        };

        debug!("Parsing {} as level {}", name, file.level);
        let mut level_model = ApiModel::new();

        match merge_level(&mut level_model, file.level, file.format, &name, &text) {
            Ok(counts) => {
                model.merge(level_model);
                info!(
                    "Level {} ({}): {} classes, {} methods, {} fields",
                    file.level, name, counts.classes, counts.methods, counts.fields
                );
                Ok(LevelStatus::Merged(counts))
            }
            Err(e)
                if e.is_input_error()
                    && self.config.input.on_parse_error == ParseErrorPolicy::Skip =>
            {
                warn!("Skipping level {}: {}", file.level, e);
                Ok(LevelStatus::Skipped {
                    reason: e.to_string(),
                })
            }
            Err(e) => Err(e),
        }
    }
}
