use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Application-level constants
pub const APP_NAME: &str = "emr-metrics";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

const CONFIG_FILE_NAME: &str = "config.json";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Default tracing filter when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    "emr_metrics_lib=info"
}

/// Filter used with `--verbose`.
pub fn verbose_log_filter() -> &'static str {
    "emr_metrics_lib=debug"
}

/// Per-user configuration directory (`~/.emr-metrics/`), if a home
/// directory can be determined.
pub fn config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(format!(".{APP_NAME}")))
}

/// Default configuration file location.
pub fn default_config_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join(CONFIG_FILE_NAME))
}

/// Batch settings. Every field has a default, so a config file only
/// needs the keys it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Extensions treated as patient text files, matched case-insensitively.
    pub extensions: Vec<String>,
    /// Files above this size are skipped.
    pub max_file_size_mb: u64,
    /// Assemble files on a worker pool.
    pub parallel: bool,
    /// Worker pool size; rayon's default when unset.
    pub worker_threads: Option<usize>,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            extensions: vec!["txt".to_string()],
            max_file_size_mb: 10,
            parallel: true,
            worker_threads: None,
        }
    }
}

impl BatchConfig {
    /// Load config from a JSON file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Explicit path if given, else the per-user file if it exists, else
    /// defaults.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        match default_config_path() {
            Some(path) if path.exists() => {
                tracing::debug!(path = %path.display(), "Loading user config");
                Self::load(&path)
            }
            _ => Ok(Self::default()),
        }
    }
}
