use std::path::PathBuf;

use thiserror::Error;

use super::extraction::FieldError;
use crate::models::Field;

/// Why a single patient file produced no record.
#[derive(Error, Debug)]
pub enum RecordError {
    #[error("Cannot read {path}: {source}")]
    MissingInput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("File too large: {size_mb:.1}MB exceeds {max_mb}MB limit")]
    FileTooLarge { size_mb: f64, max_mb: u64 },

    #[error("Malformed record in field '{field}': {source}")]
    Malformed {
        field: Field,
        #[source]
        source: FieldError,
    },
}

impl RecordError {
    /// The extraction field that failed, if the failure came from one.
    pub fn field(&self) -> Option<Field> {
        match self {
            Self::Malformed { field, .. } => Some(*field),
            _ => None,
        }
    }
}

/// Failure of the batch as a whole. Per-file failures never end up here.
#[derive(Error, Debug)]
pub enum BatchError {
    #[error("Cannot list input directory {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Worker pool setup failed: {0}")]
    WorkerPool(String),
}
