pub mod config;
pub mod models;
pub mod pipeline;

use std::io::Write;
use std::path::{Path, PathBuf};

use clap::Parser;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

use config::{BatchConfig, ConfigError};
use models::PatientRecord;
use pipeline::BatchError;

/// Extract weight, height, lab and history metrics from EMR text dumps
/// (one `<MRN>.txt` per patient) into one row per patient.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Directory holding the patient text files
    #[arg(default_value = ".")]
    pub directory: PathBuf,

    /// Write records as JSON to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Batch config file (JSON); defaults to ~/.emr-metrics/config.json if present
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Process files one at a time
    #[arg(long)]
    pub sequential: bool,

    /// Number of worker threads
    #[arg(short, long)]
    pub jobs: Option<usize>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Batch(#[from] BatchError),

    #[error("Failed to write output {path}: {source}")]
    Output {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize records: {0}")]
    Serialize(#[from] serde_json::Error),
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose {
        config::verbose_log_filter()
    } else {
        config::default_log_filter()
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)),
        )
        .init();
}

fn apply_overrides(mut config: BatchConfig, args: &Args) -> BatchConfig {
    if args.sequential {
        config.parallel = false;
    }
    if let Some(jobs) = args.jobs {
        config.worker_threads = Some(jobs.max(1));
    }
    config
}

/// Serialize records as a JSON array, keys in column order.
pub fn write_records<W: Write>(writer: W, records: &[PatientRecord]) -> Result<(), AppError> {
    serde_json::to_writer_pretty(writer, records)?;
    Ok(())
}

fn write_output(path: Option<&Path>, records: &[PatientRecord]) -> Result<(), AppError> {
    let output_error = |source| AppError::Output {
        path: path.map_or_else(|| "<stdout>".to_string(), |p| p.display().to_string()),
        source,
    };

    match path {
        Some(path) => {
            let file = std::fs::File::create(path).map_err(output_error)?;
            let mut writer = std::io::BufWriter::new(file);
            write_records(&mut writer, records)?;
            writer.flush().map_err(output_error)
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            write_records(&mut stdout, records)?;
            writeln!(stdout).map_err(output_error)
        }
    }
}

/// CLI entry point.
pub fn run(args: Args) -> Result<(), AppError> {
    init_tracing(args.verbose);
    tracing::info!("{} v{}", config::APP_NAME, config::APP_VERSION);

    let config = apply_overrides(BatchConfig::resolve(args.config.as_deref())?, &args);
    let result = pipeline::run_batch(&args.directory, &config)?;

    write_output(args.output.as_deref(), &result.records)?;
    eprintln!("{}", result.summary());
    Ok(())
}
