//! Unified error types for the bootstrapper workspace.
//!
//! Every stage returns [`BootstrapperError`]. The outermost boundary decides
//! whether an error fails the process or is only logged.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Top-level error type shared across the workspace.
#[derive(Debug, Error)]
pub enum BootstrapperError {
    /// An I/O operation failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path where the I/O error occurred.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// A JSON document could not be decoded or encoded.
    #[error("failed to process JSON at {path}: {source}")]
    Serialization {
        /// File (or flag name) the document came from.
        path: PathBuf,
        /// Underlying serialization error.
        source: serde_json::Error,
    },

    /// A path that must be a directory is something else.
    #[error("{path} is not a directory")]
    NotADirectory {
        /// Offending path.
        path: PathBuf,
    },

    /// The requested combination of inputs is not allowed.
    #[error("validation failed: {message}")]
    Validation {
        /// Description of the violated rule.
        message: String,
    },
}

impl BootstrapperError {
    /// Wraps an I/O error with the path it happened at.
    pub fn io(path: impl AsRef<Path>, source: io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Wraps a JSON error with the document it came from.
    pub fn serialization(path: impl AsRef<Path>, source: serde_json::Error) -> Self {
        Self::Serialization {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Returns `true` when the error is an I/O "file does not exist" error.
    ///
    /// Optional inputs use this to turn absence into a skip.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Io { source, .. } if source.kind() == io::ErrorKind::NotFound)
    }
}

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, BootstrapperError>;
