//! Request body pipeline: presence, shape, typed parse, per-entity rules.
//!
//! Handlers accept the raw JSON body and run it through [`parse_body`] with
//! the [`BodySchema`] of the endpoint. Each stage short-circuits with a
//! `400` wrapped under the endpoint's own message.

use serde::de::DeserializeOwned;
use serde_json::Value;
use validator::{Validate, ValidationErrors, ValidationErrorsKind};

use crate::errors::{AppError, AppResult};
use crate::utils::shape::{check_shape, Shape};
use crate::utils::string_utils::missing_fields;

/// Per-endpoint description of an acceptable body.
#[derive(Debug, Clone, Copy)]
pub struct BodySchema {
    /// Fields that must be present and non-blank.
    pub required: &'static [&'static str],
    /// Expected JSON types.
    pub shape: Shape,
    /// Envelope message when required fields are missing.
    pub missing_message: &'static str,
    /// Envelope message when types or values are wrong.
    pub invalid_message: &'static str,
}

/// Runs the full pipeline and returns the typed, validated request.
pub fn parse_body<T>(body: Value, schema: &BodySchema) -> AppResult<T>
where
    T: DeserializeOwned + Validate,
{
    let missing = missing_fields(&body, schema.required);
    if !missing.is_empty() {
        return Err(AppError::ValidationError(format!(
            "Missing required fields: {}",
            missing.join(", ")
        ))
        .failed(schema.missing_message));
    }

    check_shape(&body, &schema.shape)
        .map_err(|e| AppError::ValidationError(e.to_string()).failed(schema.invalid_message))?;

    let request: T = serde_json::from_value(body)
        .map_err(|e| AppError::ValidationError(e.to_string()).failed(schema.invalid_message))?;

    request
        .validate()
        .map_err(|e| AppError::ValidationError(validation_message(&e)).failed(schema.invalid_message))?;

    Ok(request)
}

/// Flattens `validator` errors into one line, ordered by field path.
pub fn validation_message(errors: &ValidationErrors) -> String {
    let mut messages = Vec::new();
    collect_messages(errors, "", &mut messages);
    messages.sort();
    messages.join("; ")
}

fn collect_messages(errors: &ValidationErrors, prefix: &str, out: &mut Vec<String>) {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{}.{}", prefix, field)
        };
        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                for error in field_errors {
                    match &error.message {
                        Some(message) => out.push(message.to_string()),
                        None => out.push(format!("Invalid value for {}", path)),
                    }
                }
            }
            ValidationErrorsKind::Struct(nested) => collect_messages(nested, &path, out),
            ValidationErrorsKind::List(items) => {
                for (index, nested) in items {
                    collect_messages(nested, &format!("{}[{}]", path, index), out);
                }
            }
        }
    }
}
