//! Schema validation failure types
//!
//! A failure carries every violation found in the payload. Its message is
//! the violations rendered one by one and joined with `,`, which is exactly
//! what the caller shows to the user.

use std::fmt;

/// What went wrong with a single field
#[derive(Debug, Clone, PartialEq)]
pub enum ViolationKind {
    /// Required field absent
    Required,
    /// Field not declared by the schema
    NotAllowed,
    /// Empty string where one is not allowed
    Empty,
    /// Value of the wrong JSON type
    WrongType(&'static str),
    /// Number below the inclusive minimum
    Min(f64),
    /// Number above the inclusive maximum
    Max(f64),
    /// Number with a fractional part where an integer is required
    NotInteger,
}

/// One field-level violation
#[derive(Debug, Clone, PartialEq)]
pub struct Violation {
    /// Dotted field path (e.g. `campground.price`)
    pub path: String,
    pub kind: ViolationKind,
}

impl Violation {
    pub fn new(path: impl Into<String>, kind: ViolationKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\" ", self.path)?;
        match &self.kind {
            ViolationKind::Required => write!(f, "is required"),
            ViolationKind::NotAllowed => write!(f, "is not allowed"),
            ViolationKind::Empty => write!(f, "is not allowed to be empty"),
            ViolationKind::WrongType("object") => write!(f, "must be of type object"),
            ViolationKind::WrongType("integer") => write!(f, "must be an integer"),
            ViolationKind::WrongType(name) => write!(f, "must be a {}", name),
            ViolationKind::Min(min) => {
                write!(f, "must be greater than or equal to {}", format_bound(*min))
            }
            ViolationKind::Max(max) => {
                write!(f, "must be less than or equal to {}", format_bound(*max))
            }
            ViolationKind::NotInteger => write!(f, "must be an integer"),
        }
    }
}

/// Bounds are whole numbers in practice; print `0`, not `0.0`
fn format_bound(bound: f64) -> String {
    if bound.fract() == 0.0 && bound.abs() < 1e15 {
        format!("{}", bound as i64)
    } else {
        format!("{}", bound)
    }
}

/// Payload rejected by a schema
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationFailure {
    violations: Vec<Violation>,
}

impl ValidationFailure {
    /// Build a failure. `violations` must be non-empty.
    pub fn new(violations: Vec<Violation>) -> Self {
        debug_assert!(!violations.is_empty());
        Self { violations }
    }

    /// All violations, in the order they were found
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Aggregated, comma-joined message
    pub fn message(&self) -> String {
        self.violations
            .iter()
            .map(Violation::to_string)
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ValidationFailure {}

/// Result type for schema validation
pub type SchemaResult<T> = Result<T, ValidationFailure>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_violation_wording() {
        let cases = [
            (ViolationKind::Required, "\"campground.title\" is required"),
            (ViolationKind::NotAllowed, "\"campground.title\" is not allowed"),
            (ViolationKind::Empty, "\"campground.title\" is not allowed to be empty"),
            (ViolationKind::WrongType("string"), "\"campground.title\" must be a string"),
            (ViolationKind::WrongType("object"), "\"campground.title\" must be of type object"),
            (ViolationKind::Min(0.0), "\"campground.title\" must be greater than or equal to 0"),
            (ViolationKind::Max(5.0), "\"campground.title\" must be less than or equal to 5"),
            (ViolationKind::NotInteger, "\"campground.title\" must be an integer"),
        ];
        for (kind, expected) in cases {
            assert_eq!(Violation::new("campground.title", kind).to_string(), expected);
        }
    }

    #[test]
    fn test_message_is_comma_joined() {
        let failure = ValidationFailure::new(vec![
            Violation::new("campground.title", ViolationKind::Required),
            Violation::new("campground.price", ViolationKind::Min(0.0)),
        ]);
        assert_eq!(
            failure.message(),
            "\"campground.title\" is required,\"campground.price\" must be greater than or equal to 0"
        );
        assert_eq!(failure.to_string(), failure.message());
    }

    #[test]
    fn test_fractional_bound_is_printed_as_is() {
        assert_eq!(format_bound(0.5), "0.5");
        assert_eq!(format_bound(-1.0), "-1");
    }
}
