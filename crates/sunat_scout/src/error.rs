//! Error types for discovery and packaging

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Scout error type.
///
/// Only `InvalidRootKind`, `InvalidOutputDir` and failures writing the output
/// archive itself reach callers as `Err`. The per-node variants are also used
/// as the message payload for warnings and action-log lines.
#[derive(Error, Debug)]
pub enum ScoutError {
    #[error("Invalid or non-existent search path: {}", .0.display())]
    InvalidRootKind(PathBuf),

    #[error("Output directory must be an absolute and existing path: {}", .0.display())]
    InvalidOutputDir(PathBuf),

    #[error("Invalid ZIP archive at {address}: {reason}")]
    ArchiveCorrupt { address: String, reason: String },

    #[error("Entry '{entry}' not found inside {address}")]
    EntryNotFound { address: String, entry: String },

    #[error("Source file missing on disk: {}", .0.display())]
    SourceMissing(PathBuf),

    #[error("Failed to delete {}: {reason}", .path.display())]
    DeletionFailed { path: PathBuf, reason: String },

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ScoutError {
    /// True for input validation failures the caller should report as a client error.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            ScoutError::InvalidRootKind(_) | ScoutError::InvalidOutputDir(_)
        )
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, ScoutError>;
