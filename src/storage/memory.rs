//! # In-Memory Document Store
//!
//! Collections live behind one `RwLock`; each trait call takes the lock once,
//! which is what makes single-document operations atomic. An optional
//! snapshot path gives the store a lifecycle: [`MemoryStore::open`] loads it,
//! [`DocumentStore::close`] writes it back.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, info};

use super::document::{Document, DocumentId, ID_FIELD};
use super::errors::{StorageError, StorageResult};
use super::snapshot::{read_snapshot, write_snapshot, Collections};
use super::store::{DocumentStore, UpdateOp};

/// In-process document store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<Collections>,
    snapshot_path: Option<PathBuf>,
    closed: AtomicBool,
}

impl MemoryStore {
    /// Volatile store with no snapshot file.
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a store backed by a snapshot file.
    ///
    /// A missing file yields an empty store; the file is created on the
    /// first [`flush`](Self::flush) or close.
    ///
    /// # Errors
    ///
    /// Returns `Corrupted` if an existing snapshot fails verification.
    pub fn open(snapshot_path: impl AsRef<Path>) -> StorageResult<Self> {
        let path = snapshot_path.as_ref().to_path_buf();
        let collections = read_snapshot(&path)?;
        info!(
            path = %path.display(),
            collections = collections.len(),
            documents = collections.values().map(Vec::len).sum::<usize>(),
            "document store opened"
        );
        Ok(Self {
            collections: RwLock::new(collections),
            snapshot_path: Some(path),
            closed: AtomicBool::new(false),
        })
    }

    /// Write the current contents to the snapshot file, if one is configured.
    pub fn flush(&self) -> StorageResult<()> {
        let Some(path) = &self.snapshot_path else {
            return Ok(());
        };
        let collections = self.read()?;
        write_snapshot(path, &collections)?;
        debug!(path = %path.display(), "snapshot written");
        Ok(())
    }

    /// Whether [`DocumentStore::close`] has been called.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    fn ensure_open(&self) -> StorageResult<()> {
        if self.is_closed() {
            return Err(StorageError::Closed);
        }
        Ok(())
    }

    fn read(&self) -> StorageResult<RwLockReadGuard<'_, Collections>> {
        self.collections
            .read()
            .map_err(|_| StorageError::Internal("Lock poisoned".to_string()))
    }

    fn write(&self) -> StorageResult<RwLockWriteGuard<'_, Collections>> {
        self.collections
            .write()
            .map_err(|_| StorageError::Internal("Lock poisoned".to_string()))
    }
}

fn position_of(documents: &[Document], id: DocumentId) -> Option<usize> {
    documents.iter().position(|d| DocumentId::of(d) == Some(id))
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn insert(&self, collection: &str, mut document: Document) -> StorageResult<DocumentId> {
        self.ensure_open()?;
        let id = DocumentId::new();
        document.insert(ID_FIELD.to_string(), id.to_value());

        let mut collections = self.write()?;
        collections
            .entry(collection.to_string())
            .or_default()
            .push(document);
        Ok(id)
    }

    async fn find_by_id(&self, collection: &str, id: DocumentId) -> StorageResult<Option<Value>> {
        self.ensure_open()?;
        let collections = self.read()?;
        Ok(collections.get(collection).and_then(|docs| {
            position_of(docs, id).map(|i| Value::Object(docs[i].clone()))
        }))
    }

    async fn find_all(&self, collection: &str) -> StorageResult<Vec<Value>> {
        self.ensure_open()?;
        let collections = self.read()?;
        Ok(collections
            .get(collection)
            .map(|docs| docs.iter().cloned().map(Value::Object).collect())
            .unwrap_or_default())
    }

    async fn update_by_id(
        &self,
        collection: &str,
        id: DocumentId,
        op: UpdateOp,
    ) -> StorageResult<Option<Value>> {
        self.ensure_open()?;
        let mut collections = self.write()?;
        let Some(docs) = collections.get_mut(collection) else {
            return Ok(None);
        };
        let Some(i) = position_of(docs, id) else {
            return Ok(None);
        };

        // Apply to a copy so a failed op leaves the stored document untouched
        let mut updated = docs[i].clone();
        op.apply(&mut updated)?;
        docs[i] = updated.clone();
        Ok(Some(Value::Object(updated)))
    }

    async fn delete_by_id(&self, collection: &str, id: DocumentId) -> StorageResult<Option<Value>> {
        self.ensure_open()?;
        let mut collections = self.write()?;
        let Some(docs) = collections.get_mut(collection) else {
            return Ok(None);
        };
        Ok(position_of(docs, id).map(|i| Value::Object(docs.remove(i))))
    }

    async fn delete_many(&self, collection: &str, ids: &[DocumentId]) -> StorageResult<usize> {
        self.ensure_open()?;
        if ids.is_empty() {
            return Ok(0);
        }
        let mut collections = self.write()?;
        let Some(docs) = collections.get_mut(collection) else {
            return Ok(0);
        };
        let before = docs.len();
        docs.retain(|d| DocumentId::of(d).map_or(true, |id| !ids.contains(&id)));
        Ok(before - docs.len())
    }

    async fn close(&self) -> StorageResult<()> {
        // Taken before the closed check so concurrent closes flush once
        let collections = self.write()?;
        if self.is_closed() {
            return Ok(());
        }
        if let Some(path) = &self.snapshot_path {
            write_snapshot(path, &collections)?;
            debug!(path = %path.display(), "snapshot written");
        }
        // Only a persisted store counts as closed; a failed flush can be retried
        self.closed.store(true, Ordering::Release);
        info!("document store closed");
        Ok(())
    }
}
