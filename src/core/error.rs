//! FIM-004: Error types for a reconciliation pass.
//!
//! Every variant except `Hash` is fatal to the run. `Hash` is caught inside
//! the per-file step and turned into an `Unreadable` finding.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for fimcheck operations.
pub type Result<T> = std::result::Result<T, IntegrityError>;

/// Main error type for fimcheck.
#[derive(Error, Debug)]
pub enum IntegrityError {
    /// Baseline file exists but is not a well-formed path → digest mapping.
    #[error("Failed to load JSON database: {} is corrupt: {reason}", .path.display())]
    CorruptState { path: PathBuf, reason: String },

    #[error("Failed to load JSON database: cannot read {}: {source}", .path.display())]
    BaselineRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to save JSON database: cannot write {}: {source}", .path.display())]
    BaselineWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to save JSON database: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to read directory: {}: {source}", .path.display())]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to calculate hash for file {}: {source}", .path.display())]
    Hash {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to open log file: {}: {source}", .path.display())]
    LogOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {}: {reason}", .path.display())]
    Config { path: PathBuf, reason: String },
}

impl IntegrityError {
    /// Whether this error aborts the whole pass.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::Hash { .. })
    }
}
