//! R-Droid API Generator
//!
//! Command line entry point: `apigen [enum] FOLDER OUTFILE`.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use r_droid_apigen::commands::{print_report, EnumCommand, GenerateCommand, Invocation, USAGE};
use r_droid_apigen::core::{LoggingConfig, OutputFormat, TOOL_NAME, VERSION};

#[derive(Parser, Debug)]
#[command(name = "apigen", version)]
#[command(about = "Convert per-level platform API files into one since-annotated API database")]
#[command(override_usage = USAGE)]
struct Cli {
    /// [enum] FOLDER OUTFILE
    #[arg(num_args = 2..=3, required = true, value_name = "ARGS")]
    args: Vec<String>,

    /// Configuration file (defaults to the user config directory)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Seed database merged before the first level
    #[arg(long, value_name = "FILE")]
    seed: Option<PathBuf>,

    /// Output format: xml or json
    #[arg(long, value_parser = parse_format)]
    format: Option<OutputFormat>,

    /// Log and skip levels that fail to parse instead of aborting
    #[arg(long)]
    skip_bad_levels: bool,

    /// More logging (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn parse_format(name: &str) -> std::result::Result<OutputFormat, String> {
    OutputFormat::from_name(name).ok_or_else(|| format!("unknown format '{}'", name))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let invocation = Invocation::from_args(&cli.args)?;

    match invocation {
        Invocation::EnumFromJar { jar, output } => {
            init_logging(&LoggingConfig::default(), cli.verbose);
            EnumCommand { jar, output }.execute().await?;
            Ok(ExitCode::SUCCESS)
        }
        Invocation::Generate { api_dir, output } => {
            let command = GenerateCommand {
                api_dir,
                output,
                config: cli.config,
                seed: cli.seed,
                format: cli.format,
                skip_bad_levels: cli.skip_bad_levels,
            };

            let config = command.resolve_config().await?;
            init_logging(&config.logging, cli.verbose);
            info!("{} v{} starting...", TOOL_NAME, VERSION);

            let report = command.execute_with(config).await?;
            print_report(&report);

            let skipped = report.skipped_levels();
            if skipped.is_empty() {
                Ok(ExitCode::SUCCESS)
            } else {
                warn!("Levels {:?} were skipped; the database has gaps", skipped);
                Ok(ExitCode::FAILURE)
            }
        }
    }
}

/// Install the global subscriber. `RUST_LOG` wins over `-v`, which wins over
/// the configured level.
fn init_logging(logging: &LoggingConfig, verbose: u8) {
    let level = match verbose {
        0 => logging.level.as_str(),
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_file(logging.with_file)
        .with_line_number(logging.with_file)
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}
