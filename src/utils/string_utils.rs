//! String helpers used by request validation.

use serde_json::Value;

/// Returns `true` when the string has visible content.
pub fn is_valid_string(value: &str) -> bool {
    !value.trim().is_empty()
}

/// Whether a JSON field counts as provided.
///
/// Absent, `null` and blank strings are treated as missing; any other value
/// (including `0` and `false`) is present and left to type/value checks.
pub fn is_present(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => is_valid_string(s),
        Some(_) => true,
    }
}

/// Names of the required fields that are missing from `body`.
pub fn missing_fields<'a>(body: &Value, required: &[&'a str]) -> Vec<&'a str> {
    required
        .iter()
        .copied()
        .filter(|field| !is_present(body.get(field)))
        .collect()
}
