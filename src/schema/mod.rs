//! Request validation gate for yelpcamp
//!
//! Every write payload passes through [`SchemaValidator`] before any
//! storage call is made. A rejected payload never reaches a repository.
//!
//! # Design Principles
//!
//! - Declarative schemas, evaluated per request
//! - All violations collected, never just the first
//! - Pure and deterministic
//! - Joi-compatible messages joined with `,`

mod errors;
mod types;
mod validator;

pub use errors::{SchemaResult, ValidationFailure, Violation, ViolationKind};
pub use types::{FieldDef, FieldType, Schema, SchemaName};
pub use validator::{coerce_number, SchemaValidator};
