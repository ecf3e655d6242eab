//! # Campground and Review Repositories
//!
//! Typed CRUD over the document store plus the referential-integrity rules
//! that link campgrounds to their reviews.
//!
//! - A campground can only be deleted through
//!   [`CampgroundRepository::delete`], which always cascades to its reviews
//! - Adding a review appends its id to the owner; removing one pulls it
//! - [`IntegrityChecker`] finds (and repairs) the dangling references and
//!   orphan reviews that partial failures can leave behind

mod campground;
mod errors;
mod integrity;
mod review;

pub use campground::{Campground, CampgroundDetail, CampgroundInput, CampgroundPatch, CampgroundRepository};
pub use errors::{RepositoryError, RepositoryResult};
pub use integrity::{ConsistencyReport, DanglingReference, IntegrityChecker, RepairSummary};
pub use review::{Review, ReviewInput, ReviewPatch, ReviewRepository};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::storage::Document;

/// Collection holding campground documents
pub const CAMPGROUNDS: &str = "campgrounds";

/// Collection holding review documents
pub const REVIEWS: &str = "reviews";

/// Decode a stored document into its record type.
fn decode<T: DeserializeOwned>(entity: &'static str, doc: Value) -> RepositoryResult<T> {
    serde_json::from_value(doc).map_err(|e| RepositoryError::malformed(entity, e.to_string()))
}

/// Encode a record (or patch) into a document body.
fn encode<T: Serialize>(entity: &'static str, value: &T) -> RepositoryResult<Document> {
    match serde_json::to_value(value) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(RepositoryError::malformed(entity, "record did not encode to an object")),
        Err(e) => Err(RepositoryError::malformed(entity, e.to_string())),
    }
}
