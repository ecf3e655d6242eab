//! Document storage for yelpcamp
//!
//! The store is an external collaborator of the core: a generic async CRUD
//! interface over named collections of JSON documents. The core only relies
//! on the [`DocumentStore`] trait; [`MemoryStore`] is the in-process
//! implementation used by the server and the tests.
//!
//! # Guarantees
//!
//! - Store-assigned identifiers (`_id`)
//! - Per-document atomicity, nothing across documents
//! - Absent documents are `None`, never an error
//! - Explicit lifecycle: open at startup, close at shutdown

mod checksum;
mod document;
mod errors;
mod memory;
mod snapshot;
mod store;

pub use document::{Document, DocumentId, ID_FIELD};
pub use errors::{StorageError, StorageResult};
pub use memory::MemoryStore;
pub use store::{DocumentStore, UpdateOp};
