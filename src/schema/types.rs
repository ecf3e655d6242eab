//! Schema type definitions
//!
//! Supported types:
//! - string: UTF-8 string, empty rejected unless allowed
//! - number: any finite number, optional bounds
//! - integer: number with no fractional part, optional bounds
//! - object: nested object with ordered field definitions
//!
//! Field order is significant: violations are reported in declaration order.

use serde::{Deserialize, Serialize};

/// Supported field types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FieldType {
    /// UTF-8 string
    String {
        #[serde(default)]
        allow_empty: bool,
    },
    /// Finite number (JSON number or numeric string)
    Number,
    /// Whole number (JSON number or numeric string)
    Integer,
    /// Nested object with its own field schema
    Object {
        /// Nested field definitions, in declaration order
        fields: Vec<(String, FieldDef)>,
    },
}

impl FieldType {
    /// Returns the type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldType::String { .. } => "string",
            FieldType::Number => "number",
            FieldType::Integer => "integer",
            FieldType::Object { .. } => "object",
        }
    }
}

/// Field definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDef {
    /// Field data type
    #[serde(flatten)]
    pub field_type: FieldType,
    /// Whether field must be present
    pub required: bool,
    /// Inclusive lower bound for numeric fields
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    /// Inclusive upper bound for numeric fields
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

impl FieldDef {
    fn of(field_type: FieldType, required: bool) -> Self {
        Self {
            field_type,
            required,
            min: None,
            max: None,
        }
    }

    /// Create a required non-empty string field
    pub fn required_string() -> Self {
        Self::of(FieldType::String { allow_empty: false }, true)
    }

    /// Create a required number field
    pub fn required_number() -> Self {
        Self::of(FieldType::Number, true)
    }

    /// Create a required integer field
    pub fn required_int() -> Self {
        Self::of(FieldType::Integer, true)
    }

    /// Create a required object field
    pub fn required_object(fields: Vec<(String, FieldDef)>) -> Self {
        Self::of(FieldType::Object { fields }, true)
    }

    /// Set an inclusive lower bound
    pub fn min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    /// Set an inclusive upper bound
    pub fn max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }
}

/// Names of the schemas the service validates against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaName {
    /// Campground create/update payloads
    Campground,
    /// Review create payloads
    Review,
}

impl SchemaName {
    /// Wrapper key the payload must carry
    pub fn wrapper(&self) -> &'static str {
        match self {
            SchemaName::Campground => "campground",
            SchemaName::Review => "review",
        }
    }
}

/// A request payload schema: top-level fields in declaration order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    pub name: SchemaName,
    pub fields: Vec<(String, FieldDef)>,
}

impl Schema {
    /// `{ campground: { title, location, image, price >= 0, description } }`
    pub fn campground() -> Self {
        let inner = vec![
            ("title".to_string(), FieldDef::required_string()),
            ("location".to_string(), FieldDef::required_string()),
            ("image".to_string(), FieldDef::required_string()),
            ("price".to_string(), FieldDef::required_number().min(0.0)),
            ("description".to_string(), FieldDef::required_string()),
        ];
        Self {
            name: SchemaName::Campground,
            fields: vec![(
                SchemaName::Campground.wrapper().to_string(),
                FieldDef::required_object(inner),
            )],
        }
    }

    /// `{ review: { rating: integer 1..=5, body } }`
    pub fn review() -> Self {
        let inner = vec![
            ("rating".to_string(), FieldDef::required_int().min(1.0).max(5.0)),
            ("body".to_string(), FieldDef::required_string()),
        ];
        Self {
            name: SchemaName::Review,
            fields: vec![(
                SchemaName::Review.wrapper().to_string(),
                FieldDef::required_object(inner),
            )],
        }
    }

    /// Built-in schema for a name
    pub fn named(name: SchemaName) -> Self {
        match name {
            SchemaName::Campground => Self::campground(),
            SchemaName::Review => Self::review(),
        }
    }
}
