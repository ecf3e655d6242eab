//! # Document Store Interface
//!
//! Async CRUD surface over named collections of JSON documents.
//! Every operation addresses a single document (or a batch of independent
//! single-document deletes) and is atomic per document. Nothing here spans
//! documents transactionally.

use async_trait::async_trait;
use serde_json::{Map, Value};

use super::document::{Document, DocumentId, ID_FIELD};
use super::errors::{StorageError, StorageResult};

/// Single-document modification applied by [`DocumentStore::update_by_id`].
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateOp {
    /// Overwrite the listed top-level fields, leaving the rest untouched
    Set(Map<String, Value>),
    /// Append `value` to the array at `field` (created if absent)
    Push { field: String, value: Value },
    /// Remove every element equal to `value` from the array at `field`
    Pull { field: String, value: Value },
}

impl UpdateOp {
    /// Apply this operation to a document in place.
    ///
    /// # Errors
    ///
    /// - `InvalidDocument` when a `Set` tries to rewrite `_id`
    /// - `NotAnArray` when `Push`/`Pull` target a non-array field
    pub fn apply(&self, document: &mut Document) -> StorageResult<()> {
        match self {
            UpdateOp::Set(fields) => {
                if fields.contains_key(ID_FIELD) {
                    return Err(StorageError::InvalidDocument(
                        "_id is immutable".to_string(),
                    ));
                }
                for (key, value) in fields {
                    document.insert(key.clone(), value.clone());
                }
            }
            UpdateOp::Push { field, value } => {
                let slot = document
                    .entry(field.clone())
                    .or_insert_with(|| Value::Array(Vec::new()));
                let arr = slot
                    .as_array_mut()
                    .ok_or_else(|| StorageError::NotAnArray(field.clone()))?;
                arr.push(value.clone());
            }
            UpdateOp::Pull { field, value } => match document.get_mut(field) {
                // Pulling from a field that was never set is a no-op
                None => {}
                Some(slot) => {
                    let arr = slot
                        .as_array_mut()
                        .ok_or_else(|| StorageError::NotAnArray(field.clone()))?;
                    arr.retain(|v| v != value);
                }
            },
        }
        Ok(())
    }
}

/// Storage handle shared by the repositories.
///
/// Implementations must make each single-document call atomic with respect
/// to concurrent callers. A lookup of an absent id is `Ok(None)`, never an
/// error.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert a new document and return its assigned id.
    ///
    /// Any `_id` present in `document` is replaced.
    async fn insert(&self, collection: &str, document: Document) -> StorageResult<DocumentId>;

    /// Fetch a document by id.
    async fn find_by_id(&self, collection: &str, id: DocumentId) -> StorageResult<Option<Value>>;

    /// All documents of a collection in insertion order.
    async fn find_all(&self, collection: &str) -> StorageResult<Vec<Value>>;

    /// Apply `op` to a document and return the updated document.
    async fn update_by_id(
        &self,
        collection: &str,
        id: DocumentId,
        op: UpdateOp,
    ) -> StorageResult<Option<Value>>;

    /// Remove a document and return what was removed.
    async fn delete_by_id(&self, collection: &str, id: DocumentId) -> StorageResult<Option<Value>>;

    /// Remove every listed document that exists. Absent ids are skipped.
    /// Returns how many documents were removed.
    async fn delete_many(&self, collection: &str, ids: &[DocumentId]) -> StorageResult<usize>;

    /// Release the handle. Further calls fail with `StorageError::Closed`.
    async fn close(&self) -> StorageResult<()> {
        Ok(())
    }
}
