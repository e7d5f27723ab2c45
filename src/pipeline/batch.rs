//! Batch driver.
//!
//! Lists a directory, assembles every recognized text file and collects
//! the records. A file that fails is logged and reported as skipped; it
//! never aborts the batch. Files are independent, so they may be assembled
//! on a rayon pool. Output keeps directory listing order either way.

use std::path::{Path, PathBuf};
use std::time::Instant;

use rayon::prelude::*;

use super::assembler::assemble_file;
use super::error::{BatchError, RecordError};
use crate::config::BatchConfig;
use crate::models::PatientRecord;

/// A file that produced no record, and why.
#[derive(Debug, Clone)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub field: Option<String>,
    pub reason: String,
}

/// Outcome of one batch run.
#[derive(Debug, Default)]
pub struct BatchResult {
    pub records: Vec<PatientRecord>,
    pub skipped: Vec<SkippedFile>,
    pub duration_ms: u64,
}

impl BatchResult {
    pub fn processed(&self) -> usize {
        self.records.len()
    }

    pub fn summary(&self) -> String {
        format!(
            "Processed {} file(s), skipped {}",
            self.processed(),
            self.skipped.len()
        )
    }
}

fn has_recognized_extension(path: &Path, config: &BatchConfig) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            config
                .extensions
                .iter()
                .any(|known| known.trim_start_matches('.').eq_ignore_ascii_case(ext))
        })
}

/// Regular files with a recognized extension, in directory listing order.
pub fn list_input_files(
    directory: &Path,
    config: &BatchConfig,
) -> Result<Vec<PathBuf>, BatchError> {
    let io_error = |source| BatchError::Io {
        path: directory.to_path_buf(),
        source,
    };

    let mut files = Vec::new();
    for entry in std::fs::read_dir(directory).map_err(io_error)? {
        let path = match entry {
            Ok(entry) => entry.path(),
            Err(e) => {
                tracing::warn!(
                    directory = %directory.display(),
                    error = %e,
                    "Skipping unreadable directory entry"
                );
                continue;
            }
        };
        if path.is_file() && has_recognized_extension(&path, config) {
            files.push(path);
        }
    }
    Ok(files)
}

fn assemble_all(
    files: &[PathBuf],
    config: &BatchConfig,
) -> Result<Vec<Result<PatientRecord, RecordError>>, BatchError> {
    if !config.parallel {
        return Ok(files.iter().map(|path| assemble_file(path, config)).collect());
    }

    let assemble = || {
        files
            .par_iter()
            .map(|path| assemble_file(path, config))
            .collect::<Vec<_>>()
    };

    match config.worker_threads {
        Some(threads) => {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()
                .map_err(|e| BatchError::WorkerPool(e.to_string()))?;
            Ok(pool.install(assemble))
        }
        None => Ok(assemble()),
    }
}

/// Assemble every patient file in `directory`.
pub fn run_batch(directory: &Path, config: &BatchConfig) -> Result<BatchResult, BatchError> {
    let start = Instant::now();
    let files = list_input_files(directory, config)?;

    tracing::info!(
        directory = %directory.display(),
        files = files.len(),
        parallel = config.parallel,
        "Starting extraction batch"
    );

    let outcomes = assemble_all(&files, config)?;

    let mut result = BatchResult::default();
    for (path, outcome) in files.into_iter().zip(outcomes) {
        match outcome {
            Ok(record) => result.records.push(record),
            Err(e) => {
                let field = e.field().map(|f| f.to_string());
                tracing::warn!(
                    file = %path.display(),
                    field = field.as_deref().unwrap_or("-"),
                    error = %e,
                    "Skipping patient file"
                );
                result.skipped.push(SkippedFile {
                    path,
                    field,
                    reason: e.to_string(),
                });
            }
        }
    }

    result.duration_ms = start.elapsed().as_millis() as u64;
    tracing::info!(
        processed = result.processed(),
        skipped = result.skipped.len(),
        duration_ms = result.duration_ms,
        "Extraction batch finished"
    );

    Ok(result)
}
