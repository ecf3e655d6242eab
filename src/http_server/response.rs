//! Success bodies
//!
//! Failures always use [`ErrorEnvelope`](crate::errors::ErrorEnvelope);
//! these are the shapes of everything else.

use serde::Serialize;

/// Collection listing
#[derive(Debug, Serialize)]
pub struct ListResponse<T> {
    pub data: Vec<T>,
    pub count: usize,
}

impl<T> ListResponse<T> {
    pub fn new(data: Vec<T>) -> Self {
        let count = data.len();
        Self { data, count }
    }
}

/// A single record, optionally with a notice for the user
#[derive(Debug, Serialize)]
pub struct DataResponse<T> {
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
}

impl<T> DataResponse<T> {
    pub fn new(data: T) -> Self {
        Self { data, message: None }
    }

    pub fn with_message(data: T, message: &'static str) -> Self {
        Self {
            data,
            message: Some(message),
        }
    }
}

/// Notice plus where the client should go next
#[derive(Debug, Serialize)]
pub struct NoticeResponse {
    pub message: &'static str,
    pub redirect: String,
}

impl NoticeResponse {
    pub fn new(message: &'static str, redirect: impl Into<String>) -> Self {
        Self {
            message,
            redirect: redirect.into(),
        }
    }
}

/// Caller-level "record is gone" notice, sent instead of an envelope
#[derive(Debug, Serialize)]
pub struct MissingNotice {
    pub error: &'static str,
    pub redirect: &'static str,
}
