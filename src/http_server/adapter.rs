//! # Async Failure Adapter
//!
//! Wraps a handler's async body so that any way it can fail reaches the
//! error boundary as an [`ErrorEnvelope`]:
//!
//! - `Err(AppError)` becomes the error's envelope
//! - a panic while polling becomes the default 500 envelope
//!
//! Server-side failures are logged in full here; the caller only sees the
//! envelope.

use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;

use axum::response::{IntoResponse, Response};
use futures_util::FutureExt;
use tracing::{debug, error};

use crate::errors::{AppError, ErrorEnvelope};

/// Run `operation`, routing every failure to an envelope.
pub async fn catch_async<T, F>(operation: &'static str, fut: F) -> Result<T, ErrorEnvelope>
where
    F: Future<Output = Result<T, AppError>>,
{
    match AssertUnwindSafe(fut).catch_unwind().await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(err)) => {
            match &err {
                AppError::Storage(e) => {
                    error!(operation, error = %e, transient = e.is_transient(), "storage failure");
                }
                e if e.status_code() >= 500 => error!(operation, error = %e, "request failed"),
                e => debug!(operation, error = %e, "request rejected"),
            }
            Err(err.envelope())
        }
        Err(panic) => {
            error!(operation, panic = %panic_message(panic.as_ref()), "handler panicked");
            Err(ErrorEnvelope::default())
        }
    }
}

/// Response for a panic that escaped a handler; installed on the router's
/// catch-panic layer.
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    error!(panic = %panic_message(panic.as_ref()), "panic reached the service layer");
    ErrorEnvelope::default().into_response()
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    if let Some(s) = panic.downcast_ref::<&'static str>() {
        s
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.as_str()
    } else {
        "unknown panic payload"
    }
}
