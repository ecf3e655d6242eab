//! Document identity
//!
//! Every stored document is a JSON object carrying its store-assigned
//! identifier under `_id`.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Field that holds the store-assigned identifier.
pub const ID_FIELD: &str = "_id";

/// A stored document body.
pub type Document = Map<String, Value>;

/// Opaque identifier assigned by the store on insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(Uuid);

impl DocumentId {
    /// Generate a fresh identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse an identifier from its textual form. Malformed input yields `None`.
    pub fn parse(s: &str) -> Option<Self> {
        Uuid::parse_str(s).ok().map(Self)
    }

    /// Read the identifier stored in a document, if any.
    pub fn of(document: &Document) -> Option<Self> {
        document
            .get(ID_FIELD)
            .and_then(Value::as_str)
            .and_then(Self::parse)
    }

    /// JSON form, as stored in `_id` and in reference lists.
    pub fn to_value(self) -> Value {
        Value::String(self.0.to_string())
    }
}

impl Default for DocumentId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
