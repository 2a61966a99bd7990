//! Storage error types.

use thiserror::Error;

/// Result type alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The path cannot be mapped onto the backend.
    #[error("invalid storage path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },

    /// Backend I/O failed.
    #[error("storage I/O error at '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// A stored value could not be encoded or decoded.
    #[error("failed to (de)serialize value at '{path}': {source}")]
    Serialization {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// A lock guarding in-memory state was poisoned.
    #[error("storage lock poisoned: {0}")]
    Poisoned(String),
}

impl StorageError {
    pub(crate) fn invalid_path(path: &str, reason: impl Into<String>) -> Self {
        Self::InvalidPath {
            path: path.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn io(path: &str, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_string(),
            source,
        }
    }
}
