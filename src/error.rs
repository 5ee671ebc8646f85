//! Error types for wtfile
//!
//! Only capture-stage and database-stage failures surface here. Per-record
//! problems in the signature database and archive failures during container
//! refinement are absorbed where they happen.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::common::probe::PROBE_WINDOW_LEN;

/// Result type alias for wtfile operations
pub type Result<T> = std::result::Result<T, WtError>;

/// Errors that abort an identification run
#[derive(Debug, Error)]
pub enum WtError {
    /// Target file is shorter than the probe window
    #[error("File {} is too short: {actual} bytes read, {} required", .path.display(), PROBE_WINDOW_LEN)]
    InsufficientBytes { path: PathBuf, actual: usize },

    /// Filesystem refused access to the target
    #[error("Access to the path is denied: {}: {source}", .path.display())]
    AccessDenied {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("File not found: {}", .path.display())]
    NotFound { path: PathBuf },

    /// Signature database could not be read
    #[error("Failed to load signature database {}: {reason}", .path.display())]
    Database { path: PathBuf, reason: String },

    #[error("Malformed signature database: {0}")]
    Json(#[from] serde_json::Error),

    #[error("An error occurred: {0}")]
    Io(#[from] io::Error),
}

impl WtError {
    /// Map an I/O error raised while touching `path` onto the taxonomy
    pub fn from_io(path: impl Into<PathBuf>, err: io::Error) -> Self {
        let path = path.into();
        match err.kind() {
            io::ErrorKind::PermissionDenied => WtError::AccessDenied { path, source: err },
            io::ErrorKind::NotFound => WtError::NotFound { path },
            _ => WtError::Io(err),
        }
    }
}
