//! # Document Store Errors

use thiserror::Error;

/// Result type for document store operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Document store errors
///
/// A missing document is never an error at this layer: lookups return
/// `Option` and callers decide what absence means.
#[derive(Debug, Clone, Error)]
pub enum StorageError {
    /// Document body is not a JSON object or violates a store rule
    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    /// Push/Pull addressed a field that holds something other than an array
    #[error("Field '{0}' is not an array")]
    NotAnArray(String),

    /// Store was closed and no longer accepts operations
    #[error("Store is closed")]
    Closed,

    /// Snapshot file failed its integrity check
    #[error("Snapshot corrupted: {0}")]
    Corrupted(String),

    // I/O errors
    #[error("I/O error: {0}")]
    IoError(String),

    // Internal
    #[error("Internal error: {0}")]
    Internal(String),
}

impl StorageError {
    /// I/O error with the path it happened at
    pub fn io_at_path(path: &std::path::Path, err: std::io::Error) -> Self {
        StorageError::IoError(format!("{}: {}", path.display(), err))
    }

    /// Whether retrying the same operation could succeed
    pub fn is_transient(&self) -> bool {
        matches!(self, StorageError::IoError(_) | StorageError::Internal(_))
    }
}
