//! Shared helpers for integration tests
//!
//! - [`FaultyStore`]: a `MemoryStore` that fails (or panics) on chosen calls,
//!   or lets another writer get in just before one
//! - payload builders
//! - one-shot request helpers over the full router

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use yelpcamp::http_server::{build_router, AppState, HttpServerConfig};
use yelpcamp::storage::{
    Document, DocumentId, DocumentStore, MemoryStore, StorageError, StorageResult, UpdateOp,
};

// =============================================================================
// Fault Injection
// =============================================================================

/// Store operations a fault can target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Insert,
    FindById,
    FindAll,
    Update,
    Delete,
    DeleteMany,
}

/// What happens when a fault fires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    Fail,
    Panic,
}

/// A concurrent write that lands just before an intercepted call
#[derive(Debug, Clone)]
pub enum Interference {
    Delete {
        collection: &'static str,
        id: DocumentId,
    },
    Update {
        collection: &'static str,
        id: DocumentId,
        op: UpdateOp,
    },
}

/// Delegates to a `MemoryStore` unless a fault is armed for the call.
#[derive(Default)]
pub struct FaultyStore {
    inner: MemoryStore,
    faults: Mutex<Vec<(Op, &'static str, Fault)>>,
    interferences: Mutex<Vec<(Op, &'static str, Interference)>>,
}

impl FaultyStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Make every `op` on `collection` fail until disarmed.
    pub fn fail(&self, op: Op, collection: &'static str) {
        self.arm(op, collection, Fault::Fail);
    }

    pub fn panic_on(&self, op: Op, collection: &'static str) {
        self.arm(op, collection, Fault::Panic);
    }

    /// Run `write` once, right before the next `op` on `collection`.
    pub fn interfere(&self, op: Op, collection: &'static str, write: Interference) {
        self.interferences
            .lock()
            .unwrap()
            .push((op, collection, write));
    }

    pub fn disarm(&self) {
        self.faults.lock().unwrap().clear();
        self.interferences.lock().unwrap().clear();
    }

    fn arm(&self, op: Op, collection: &'static str, fault: Fault) {
        self.faults.lock().unwrap().push((op, collection, fault));
    }

    async fn interleave(&self, op: Op, collection: &str) -> StorageResult<()> {
        let write = {
            let mut pending = self.interferences.lock().unwrap();
            pending
                .iter()
                .position(|(o, c, _)| *o == op && *c == collection)
                .map(|i| pending.remove(i).2)
        };
        match write {
            None => {}
            Some(Interference::Delete { collection, id }) => {
                self.inner.delete_by_id(collection, id).await?;
            }
            Some(Interference::Update { collection, id, op }) => {
                self.inner.update_by_id(collection, id, op).await?;
            }
        }
        Ok(())
    }

    fn check(&self, op: Op, collection: &str) -> StorageResult<()> {
        let fault = self
            .faults
            .lock()
            .unwrap()
            .iter()
            .find(|(o, c, _)| *o == op && *c == collection)
            .map(|(_, _, f)| *f);
        match fault {
            None => Ok(()),
            Some(Fault::Fail) => Err(StorageError::IoError(format!(
                "injected {:?} fault on {}",
                op, collection
            ))),
            Some(Fault::Panic) => panic!("injected {:?} panic on {}", op, collection),
        }
    }
}

#[async_trait]
impl DocumentStore for FaultyStore {
    async fn insert(&self, collection: &str, document: Document) -> StorageResult<DocumentId> {
        self.check(Op::Insert, collection)?;
        self.interleave(Op::Insert, collection).await?;
        self.inner.insert(collection, document).await
    }

    async fn find_by_id(&self, collection: &str, id: DocumentId) -> StorageResult<Option<Value>> {
        self.check(Op::FindById, collection)?;
        self.interleave(Op::FindById, collection).await?;
        self.inner.find_by_id(collection, id).await
    }

    async fn find_all(&self, collection: &str) -> StorageResult<Vec<Value>> {
        self.check(Op::FindAll, collection)?;
        self.interleave(Op::FindAll, collection).await?;
        self.inner.find_all(collection).await
    }

    async fn update_by_id(
        &self,
        collection: &str,
        id: DocumentId,
        op: UpdateOp,
    ) -> StorageResult<Option<Value>> {
        self.check(Op::Update, collection)?;
        self.interleave(Op::Update, collection).await?;
        self.inner.update_by_id(collection, id, op).await
    }

    async fn delete_by_id(&self, collection: &str, id: DocumentId) -> StorageResult<Option<Value>> {
        self.check(Op::Delete, collection)?;
        self.interleave(Op::Delete, collection).await?;
        self.inner.delete_by_id(collection, id).await
    }

    async fn delete_many(&self, collection: &str, ids: &[DocumentId]) -> StorageResult<usize> {
        self.check(Op::DeleteMany, collection)?;
        self.interleave(Op::DeleteMany, collection).await?;
        self.inner.delete_many(collection, ids).await
    }
}

// =============================================================================
// Payloads
// =============================================================================

pub fn riverbend() -> Value {
    json!({
        "campground": {
            "title": "Riverbend",
            "location": "CO",
            "image": "http://x/i.jpg",
            "price": 15,
            "description": "quiet spot"
        }
    })
}

pub fn review(rating: Value, body: &str) -> Value {
    json!({ "review": { "rating": rating, "body": body } })
}

// =============================================================================
// Router Helpers
// =============================================================================

pub fn app(store: Arc<dyn DocumentStore>) -> Router {
    build_router(&HttpServerConfig::default(), AppState::new(store))
}

pub fn memory_app() -> (Arc<MemoryStore>, Router) {
    let store = Arc::new(MemoryStore::new());
    let router = app(store.clone());
    (store, router)
}

/// Send one request; returns status and parsed JSON body (`Null` if empty).
pub async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let raw = body.map(|b| b.to_string());
    send_raw(app, method, uri, raw.as_deref()).await
}

pub async fn send_raw(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<&str>,
) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(text) => builder
            .header("content-type", "application/json")
            .body(Body::from(text.to_string())),
        None => builder.body(Body::empty()),
    }
    .unwrap();
    send_request(app, request).await
}

/// Send a prebuilt request; returns status and parsed JSON body.
pub async fn send_request(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

/// Create a campground through the API and return its id.
pub async fn create_campground(app: &Router, payload: Value) -> String {
    let (status, body) = send(app, "POST", "/campgrounds", Some(payload)).await;
    assert_eq!(status, StatusCode::CREATED, "unexpected body: {}", body);
    body["data"]["_id"].as_str().unwrap().to_string()
}

/// Add a review through the API and return its id.
pub async fn add_review(app: &Router, campground_id: &str, rating: i64, text: &str) -> String {
    let (status, body) = send(
        app,
        "POST",
        &format!("/campgrounds/{}/reviews", campground_id),
        Some(review(json!(rating), text)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "unexpected body: {}", body);
    body["data"]["review"]["_id"].as_str().unwrap().to_string()
}
