//! Structural type checking of JSON request bodies.
//!
//! A [`Shape`] declares the expected JSON type of each field, possibly
//! nested. [`check_shape`] walks the body in declaration order and stops at
//! the first mismatch. Value-level rules (ranges, formats) are not checked
//! here; they belong to each request type's `validate()`.

use serde_json::Value;
use thiserror::Error;

/// Expected JSON type of a value.
#[derive(Debug, Clone, Copy)]
pub enum Shape {
    String,
    Number,
    Boolean,
    /// An object with the listed fields. Unlisted fields are ignored.
    Object(&'static [(&'static str, Shape)]),
}

impl Shape {
    fn accepts(&self, value: &Value) -> bool {
        match self {
            Shape::String => value.is_string(),
            Shape::Number => value.is_number(),
            Shape::Boolean => value.is_boolean(),
            Shape::Object(fields) => value.is_object() && check_fields(value, fields).is_ok(),
        }
    }
}

/// First field whose value does not have the declared type.
///
/// For a nested object the reported field is the parent, not the inner one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid data type for {field}")]
pub struct ShapeMismatch {
    pub field: String,
}

/// Checks `value` against `shape`, short-circuiting on the first mismatch.
pub fn check_shape(value: &Value, shape: &Shape) -> Result<(), ShapeMismatch> {
    match shape {
        Shape::Object(fields) => check_fields(value, fields),
        primitive if primitive.accepts(value) => Ok(()),
        _ => Err(ShapeMismatch { field: "value".to_string() }),
    }
}

fn check_fields(value: &Value, fields: &[(&'static str, Shape)]) -> Result<(), ShapeMismatch> {
    for (name, expected) in fields {
        let field = value.get(name).unwrap_or(&Value::Null);
        if !expected.accepts(field) {
            return Err(ShapeMismatch { field: name.to_string() });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const PROFILE: Shape = Shape::Object(&[
        ("identityType", Shape::String),
        ("identityNumber", Shape::String),
    ]);

    const USER: Shape = Shape::Object(&[
        ("name", Shape::String),
        ("age", Shape::Number),
        ("profile", PROFILE),
    ]);

    #[test]
    fn test_matching_body_passes() {
        let body = json!({
            "name": "Alice",
            "age": 30,
            "profile": { "identityType": "KTP", "identityNumber": "123" },
            "extra": true
        });
        assert!(check_shape(&body, &USER).is_ok());
    }

    #[test]
    fn test_first_mismatch_wins() {
        let body = json!({ "name": 1, "age": "thirty" });
        let err = check_shape(&body, &USER).unwrap_err();
        assert_eq!(err.field, "name");
        assert_eq!(err.to_string(), "Invalid data type for name");
    }

    #[test]
    fn test_missing_field_is_a_mismatch() {
        let body = json!({ "name": "Alice" });
        assert_eq!(check_shape(&body, &USER).unwrap_err().field, "age");
    }

    #[test]
    fn test_nested_mismatch_reports_parent() {
        let body = json!({
            "name": "Alice",
            "age": 30,
            "profile": { "identityType": "KTP", "identityNumber": 123 }
        });
        assert_eq!(check_shape(&body, &USER).unwrap_err().field, "profile");

        let body = json!({ "name": "Alice", "age": 30, "profile": "KTP" });
        assert_eq!(check_shape(&body, &USER).unwrap_err().field, "profile");
    }

    #[test]
    fn test_numeric_strings_are_not_numbers() {
        let body = json!({ "name": "Alice", "age": "30", "profile": {} });
        assert_eq!(check_shape(&body, &USER).unwrap_err().field, "age");
    }

    #[test]
    fn test_primitive_root() {
        assert!(check_shape(&json!(true), &Shape::Boolean).is_ok());
        assert!(check_shape(&json!("x"), &Shape::Number).is_err());
    }
}
