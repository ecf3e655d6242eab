//! Shared handler state

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::Json;
use serde_json::Value;

use crate::errors::{AppError, AppResult};
use crate::repository::{CampgroundRepository, IntegrityChecker};
use crate::schema::{SchemaName, SchemaValidator};
use crate::storage::{DocumentId, DocumentStore};

/// Everything a handler needs, cheap to clone per request
#[derive(Clone)]
pub struct AppState {
    pub campgrounds: CampgroundRepository,
    pub integrity: IntegrityChecker,
    pub validator: Arc<SchemaValidator>,
}

impl AppState {
    /// Build repositories and the checker over one store handle.
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            campgrounds: CampgroundRepository::new(store.clone()),
            integrity: IntegrityChecker::new(store),
            validator: Arc::new(SchemaValidator::new()),
        }
    }

    /// Unwrap a JSON body and validate it against `schema`.
    ///
    /// An unreadable body keeps the extractor's status: 415 for a missing
    /// content type, 413 over the body limit, 400/422 for bad JSON.
    pub fn validated(
        &self,
        schema: SchemaName,
        body: Result<Json<Value>, JsonRejection>,
    ) -> AppResult<Value> {
        let Json(payload) = body.map_err(|rejection| AppError::UnreadableBody {
            status: rejection.status().as_u16(),
            message: rejection.body_text(),
        })?;
        self.validator.validate(schema, &payload)?;
        Ok(payload)
    }
}

/// Parse a path id; anything that is not an id cannot name a record.
pub fn parse_id(raw: &str, entity: &str) -> AppResult<DocumentId> {
    DocumentId::parse(raw).ok_or_else(|| AppError::not_found(entity))
}
