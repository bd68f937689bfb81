//! Response envelope shared by every endpoint.
//!
//! ```json
//! { "message": "Account added successfully", "data": { ... }, "code": 201, "error": null }
//! ```

use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use serde::{Deserialize, Serialize};

/// Standard response body: `{ message, data, code, error }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub message: String,
    pub data: Option<T>,
    pub code: u16,
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    /// Builds a successful response carrying `data`.
    pub fn success(status: StatusCode, message: impl Into<String>, data: T) -> HttpResponse {
        HttpResponse::build(status).json(ApiResponse {
            message: message.into(),
            data: Some(data),
            code: status.as_u16(),
            error: None,
        })
    }
}

impl ApiResponse<()> {
    /// Builds an error response with an empty `data` field.
    pub fn failure(status: StatusCode, message: impl Into<String>, error: Option<String>) -> HttpResponse {
        HttpResponse::build(status).json(ApiResponse::<()> {
            message: message.into(),
            data: None,
            code: status.as_u16(),
            error,
        })
    }
}
