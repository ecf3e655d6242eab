//! # Error Envelope
//!
//! Every failure that happens while handling a request ends up as one
//! [`ErrorEnvelope`]: a status code and a message, rendered as
//! `{"statusCode": 404, "message": "..."}` with the matching HTTP status.
//!
//! [`AppError`] is the typed outcome handlers work with; converting it to an
//! envelope is the single translation step at the request boundary.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::repository::RepositoryError;
use crate::schema::ValidationFailure;
use crate::storage::StorageError;

/// Status used when a failure carries none
pub const DEFAULT_STATUS: u16 = 500;

/// Message used when a failure carries none
pub const DEFAULT_MESSAGE: &str = "Oh No, Something went wrong!";

/// Result type for request handling
pub type AppResult<T> = Result<T, AppError>;

/// Uniform externally visible failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorEnvelope {
    pub status_code: u16,
    pub message: String,
}

impl ErrorEnvelope {
    /// Build an envelope, filling in the defaults for anything absent.
    /// An empty message counts as absent.
    pub fn from_parts(status_code: Option<u16>, message: Option<String>) -> Self {
        Self {
            status_code: status_code.unwrap_or(DEFAULT_STATUS),
            message: message
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| DEFAULT_MESSAGE.to_string()),
        }
    }

    pub fn new(status_code: u16, message: impl Into<String>) -> Self {
        Self::from_parts(Some(status_code), Some(message.into()))
    }

    /// Envelope for a method + path nothing is routed to
    pub fn page_not_found() -> Self {
        Self::new(404, "Page not found")
    }

    /// HTTP status for this envelope; out-of-range codes fall back to 500
    pub fn status(&self) -> StatusCode {
        StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl Default for ErrorEnvelope {
    fn default() -> Self {
        Self::from_parts(None, None)
    }
}

impl IntoResponse for ErrorEnvelope {
    fn into_response(self) -> Response {
        (self.status(), Json(self)).into_response()
    }
}

/// Request handling errors
#[derive(Debug, Clone, Error)]
pub enum AppError {
    // ==================
    // Client Errors (4xx)
    // ==================
    /// Payload failed its schema
    #[error("{0}")]
    Validation(#[from] ValidationFailure),

    /// Body parsed but cannot be used
    #[error("{0}")]
    BadRequest(String),

    /// Body could not be read as JSON; carries the extractor's status
    /// (400, 413, 415, 422)
    #[error("{message}")]
    UnreadableBody { status: u16, message: String },

    /// Referenced record does not exist
    #[error("{0}")]
    NotFound(String),

    // ==================
    // Server Errors (5xx)
    // ==================
    /// Underlying store failed
    #[error("Storage failure: {0}")]
    Storage(StorageError),

    /// Anything else that should not happen
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn not_found(entity: &str) -> Self {
        AppError::NotFound(format!("Cannot find that {}!", entity.to_lowercase()))
    }

    /// Get HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            AppError::Validation(_) | AppError::BadRequest(_) => 400,
            AppError::UnreadableBody { status, .. } => *status,
            AppError::NotFound(_) => 404,
            AppError::Storage(_) | AppError::Internal(_) => 500,
        }
    }

    /// The envelope shown to the caller. Server-side failures get the
    /// generic message; their detail only goes to the log.
    pub fn envelope(&self) -> ErrorEnvelope {
        let message = match self {
            AppError::Validation(failure) => Some(failure.message()),
            AppError::BadRequest(msg)
            | AppError::NotFound(msg)
            | AppError::UnreadableBody { message: msg, .. } => Some(msg.clone()),
            AppError::Storage(_) | AppError::Internal(_) => None,
        };
        ErrorEnvelope::from_parts(Some(self.status_code()), message)
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, .. } => AppError::not_found(entity),
            RepositoryError::Storage(e) => AppError::Storage(e),
            RepositoryError::Malformed { .. } => AppError::Internal(err.to_string()),
        }
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        AppError::Storage(err)
    }
}

impl From<AppError> for ErrorEnvelope {
    fn from(err: AppError) -> Self {
        err.envelope()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.envelope().into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Violation, ViolationKind};

    #[test]
    fn test_envelope_defaults() {
        let envelope = ErrorEnvelope::default();
        assert_eq!(envelope.status_code, 500);
        assert_eq!(envelope.message, "Oh No, Something went wrong!");

        let envelope = ErrorEnvelope::from_parts(Some(404), Some(String::new()));
        assert_eq!(envelope.status_code, 404);
        assert_eq!(envelope.message, DEFAULT_MESSAGE);
    }

    #[test]
    fn test_envelope_serialization() {
        let json = serde_json::to_value(ErrorEnvelope::page_not_found()).unwrap();
        assert_eq!(json["statusCode"], 404);
        assert_eq!(json["message"], "Page not found");
    }

    #[test]
    fn test_invalid_status_falls_back() {
        assert_eq!(ErrorEnvelope::new(42, "x").status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(ErrorEnvelope::new(404, "x").status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_status_codes() {
        let failure = ValidationFailure::new(vec![Violation::new("campground", ViolationKind::Required)]);
        assert_eq!(AppError::from(failure).status_code(), 400);
        assert_eq!(AppError::not_found("Campground").status_code(), 404);
        assert_eq!(AppError::Storage(StorageError::Closed).status_code(), 500);
    }

    #[test]
    fn test_unreadable_body_keeps_its_status() {
        let err = AppError::UnreadableBody {
            status: 415,
            message: "Expected request with `Content-Type: application/json`".to_string(),
        };
        let envelope = err.envelope();
        assert_eq!(envelope.status_code, 415);
        assert_eq!(envelope.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert_eq!(
            envelope.message,
            "Expected request with `Content-Type: application/json`"
        );
    }

    #[test]
    fn test_validation_message_reaches_caller() {
        let failure = ValidationFailure::new(vec![
            Violation::new("review.rating", ViolationKind::Max(5.0)),
            Violation::new("review.body", ViolationKind::Required),
        ]);
        let envelope = AppError::from(failure).envelope();
        assert_eq!(envelope.status_code, 400);
        assert_eq!(
            envelope.message,
            "\"review.rating\" must be less than or equal to 5,\"review.body\" is required"
        );
    }

    #[test]
    fn test_storage_detail_is_not_exposed() {
        let envelope = AppError::Storage(StorageError::IoError("/var/db: EIO".into())).envelope();
        assert_eq!(envelope.status_code, 500);
        assert_eq!(envelope.message, DEFAULT_MESSAGE);
    }

    #[test]
    fn test_repository_error_mapping() {
        let err = AppError::from(RepositoryError::not_found("Campground", "x"));
        assert_eq!(err.envelope().message, "Cannot find that campground!");

        let err = AppError::from(RepositoryError::Storage(StorageError::Closed));
        assert!(matches!(err, AppError::Storage(StorageError::Closed)));

        let err = AppError::from(RepositoryError::malformed("Review", "bad rating"));
        assert_eq!(err.status_code(), 500);
    }
}
