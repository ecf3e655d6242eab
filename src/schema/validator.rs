//! Schema validator for request payloads
//!
//! Validation semantics:
//! - Every declared required field is present
//! - No undeclared fields exist
//! - Strings are non-empty unless the field allows empty
//! - Numbers are finite and within inclusive bounds; integers have no
//!   fractional part
//! - Numeric strings are accepted for number fields (form-encoded clients
//!   send everything as text)
//!
//! Validation never stops at the first problem: every violation in the
//! payload is collected so the caller can report them together.

use serde_json::{Map, Value};

use super::errors::{SchemaResult, ValidationFailure, Violation, ViolationKind};
use super::types::{FieldDef, FieldType, Schema, SchemaName};

/// Path reported when the payload itself is not an object
const ROOT_PATH: &str = "value";

/// Validator for the service's request schemas.
///
/// Pure: holds only the immutable schema definitions, never mutates the
/// payload, and returns the same answer for the same input every time.
#[derive(Debug, Clone)]
pub struct SchemaValidator {
    campground: Schema,
    review: Schema,
}

impl SchemaValidator {
    /// Creates a validator with the built-in campground and review schemas.
    pub fn new() -> Self {
        Self {
            campground: Schema::named(SchemaName::Campground),
            review: Schema::named(SchemaName::Review),
        }
    }

    /// Schema registered under `name`.
    pub fn schema(&self, name: SchemaName) -> &Schema {
        match name {
            SchemaName::Campground => &self.campground,
            SchemaName::Review => &self.review,
        }
    }

    /// Validates a payload against the named schema.
    ///
    /// # Errors
    ///
    /// Returns a `ValidationFailure` listing every violation found.
    pub fn validate(&self, name: SchemaName, payload: &Value) -> SchemaResult<()> {
        Self::validate_against(self.schema(name), payload)
    }

    /// Validates a payload against an arbitrary schema.
    pub fn validate_against(schema: &Schema, payload: &Value) -> SchemaResult<()> {
        let mut violations = Vec::new();

        match payload.as_object() {
            Some(obj) => validate_object(obj, &schema.fields, "", &mut violations),
            None => violations.push(Violation::new(ROOT_PATH, ViolationKind::WrongType("object"))),
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationFailure::new(violations))
        }
    }
}

impl Default for SchemaValidator {
    fn default() -> Self {
        Self::new()
    }
}

/// Reads a number the way the validator accepts it: a JSON number, or a
/// string holding a finite decimal.
pub fn coerce_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|f| f.is_finite()),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return None;
            }
            trimmed.parse::<f64>().ok().filter(|f| f.is_finite())
        }
        _ => None,
    }
}

/// Validates an object against ordered field definitions.
fn validate_object(
    obj: &Map<String, Value>,
    fields: &[(String, FieldDef)],
    path_prefix: &str,
    violations: &mut Vec<Violation>,
) {
    // Declared fields first, in declaration order
    for (field_name, field_def) in fields {
        let field_path = make_path(path_prefix, field_name);
        match obj.get(field_name) {
            Some(value) => validate_value(value, field_def, &field_path, violations),
            None if field_def.required => {
                violations.push(Violation::new(field_path, ViolationKind::Required));
            }
            None => {}
        }
    }

    // Then anything the schema does not declare
    for key in obj.keys() {
        if !fields.iter().any(|(name, _)| name == key) {
            violations.push(Violation::new(
                make_path(path_prefix, key),
                ViolationKind::NotAllowed,
            ));
        }
    }
}

/// Validates a present value against its field definition.
fn validate_value(value: &Value, def: &FieldDef, path: &str, violations: &mut Vec<Violation>) {
    match &def.field_type {
        FieldType::String { allow_empty } => match value.as_str() {
            Some("") if !allow_empty => {
                violations.push(Violation::new(path, ViolationKind::Empty));
            }
            Some(_) => {}
            None => violations.push(Violation::new(path, ViolationKind::WrongType("string"))),
        },
        FieldType::Number => match coerce_number(value) {
            Some(n) => check_bounds(n, def, path, violations),
            None => violations.push(Violation::new(path, ViolationKind::WrongType("number"))),
        },
        FieldType::Integer => match coerce_number(value) {
            Some(n) => {
                if n.fract() != 0.0 {
                    violations.push(Violation::new(path, ViolationKind::NotInteger));
                }
                check_bounds(n, def, path, violations);
            }
            None => violations.push(Violation::new(path, ViolationKind::WrongType("number"))),
        },
        FieldType::Object { fields } => match value.as_object() {
            Some(obj) => validate_object(obj, fields, path, violations),
            None => violations.push(Violation::new(path, ViolationKind::WrongType("object"))),
        },
    }
}

fn check_bounds(n: f64, def: &FieldDef, path: &str, violations: &mut Vec<Violation>) {
    if let Some(min) = def.min {
        if n < min {
            violations.push(Violation::new(path, ViolationKind::Min(min)));
        }
    }
    if let Some(max) = def.max {
        if n > max {
            violations.push(Violation::new(path, ViolationKind::Max(max)));
        }
    }
}

/// Creates a dotted field path.
fn make_path(prefix: &str, field: &str) -> String {
    if prefix.is_empty() {
        field.to_string()
    } else {
        format!("{}.{}", prefix, field)
    }
}
