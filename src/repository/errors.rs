//! # Repository Errors

use thiserror::Error;

use crate::storage::StorageError;

/// Result type for repository operations
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Repository errors
///
/// `NotFound` is its own outcome so callers can tell "record absent" apart
/// from "storage unavailable".
#[derive(Debug, Clone, Error)]
pub enum RepositoryError {
    /// No record with this id
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// Stored document could not be decoded into its record type
    #[error("Malformed {entity} document: {reason}")]
    Malformed { entity: &'static str, reason: String },

    /// Underlying store failed
    #[error("Storage failure: {0}")]
    Storage(#[from] StorageError),
}

impl RepositoryError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        RepositoryError::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn malformed(entity: &'static str, reason: impl Into<String>) -> Self {
        RepositoryError::Malformed {
            entity,
            reason: reason.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, RepositoryError::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display() {
        let err = RepositoryError::not_found("Campground", "abc");
        assert_eq!(err.to_string(), "Campground not found: abc");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_storage_error_conversion() {
        let err = RepositoryError::from(StorageError::Closed);
        assert!(matches!(err, RepositoryError::Storage(StorageError::Closed)));
        assert!(!err.is_not_found());
    }
}
