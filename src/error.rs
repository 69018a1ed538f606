//! Error types for configuration, key generation, persistence and runs.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Invalid or missing run parameters. Reported before any worker starts.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Prefix cannot be empty")]
    EmptyPrefix,

    #[error("Prefix '{prefix}' contains '{ch}', which never appears in a base58 address")]
    InvalidPrefix { prefix: String, ch: char },

    #[error("Invalid case sensitivity '{0}': expected 'yes' or 'no'")]
    InvalidCaseSensitivity(String),

    #[error("Batch size must be at least 1")]
    InvalidBatchSize,

    #[error("Worker count {requested} is out of range (1..={max})")]
    InvalidWorkerCount { requested: usize, max: usize },

    #[error("Report interval must be at least 1 second")]
    InvalidReportInterval,

    #[error("Rolling window must hold at least 2 samples")]
    InvalidWindow,

    #[error("Failed to read input: {0}")]
    Prompt(#[from] io::Error),
}

/// The keypair capability failed. Fatal to the calling worker only.
#[derive(Debug, Error)]
#[error("Keypair generation failed: {0}")]
pub struct GeneratorError(pub String);

/// A match could not be written to the match log.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("Failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Failure of a run as a whole.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to spawn worker thread: {0}")]
    Spawn(#[source] io::Error),

    #[error("All {workers} workers failed")]
    AllWorkersFailed { workers: usize },
}
