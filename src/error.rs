//! Error types for texttracker.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the tracking engine.
///
/// Only setup failures (`Configuration`, `Subscription`, `Dictionary`,
/// `ConfigFile`) reach callers of the watcher. `Read` is produced per file and
/// handled inside the event pipeline.
#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to subscribe to file system notifications: {0}")]
    Subscription(#[from] notify::Error),

    #[error("failed to load dictionary {path}: {source}")]
    Dictionary {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config file: {0}")]
    ConfigFile(String),
}

impl TrackerError {
    pub fn invalid_root(path: &std::path::Path) -> Self {
        TrackerError::Configuration(format!("Invalid directory path: {}", path.display()))
    }
}

pub type TrackerResult<T> = Result<T, TrackerError>;
