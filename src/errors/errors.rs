//! Application-wide error system
//!
//! A single error type for the whole service, built on `thiserror` and
//! `actix_web::ResponseError`. Every variant maps to an HTTP status and is
//! rendered in the standard response envelope
//! `{ message, data, code, error }`, so nothing reaches the client as a raw
//! framework error.
//!
//! ## Example
//!
//! ```rust,ignore
//! use crate::errors::{AppError, OperationContext};
//!
//! async fn create(service: &AccountService, request: CreateAccountRequest) -> Result<HttpResponse, AppError> {
//!     let account = service
//!         .create_account(request)
//!         .await
//!         .fail_with("Failed to add account")?;
//!     Ok(ApiResponse::success(StatusCode::CREATED, "Account added successfully", account))
//! }
//! ```

use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use thiserror::Error;

use crate::domain::dto::common::api_response::ApiResponse;

/// Application-wide error type
///
/// Client-facing variants (4xx) display their message as is; server-side
/// variants (5xx) carry a prefix naming the failing subsystem.
#[derive(Error, Debug)]
pub enum AppError {
    /// Storage failure (500 Internal Server Error)
    #[error("Database error: {0}")]
    DatabaseError(String),

    /// Missing or wrongly typed input (400 Bad Request)
    #[error("{0}")]
    ValidationError(String),

    /// Well-formed request that breaks a ledger rule, e.g. insufficient
    /// balance or a transfer to the same account (400 Bad Request)
    #[error("{0}")]
    BusinessRuleError(String),

    /// Resource not found (404 Not Found)
    #[error("{0}")]
    NotFound(String),

    /// Bad credentials or invalid token (401 Unauthorized)
    #[error("{0}")]
    AuthenticationError(String),

    /// Authenticated but not allowed, or no token at all (403 Forbidden)
    #[error("{0}")]
    AuthorizationError(String),

    /// Field encryption / decryption failure (500 Internal Server Error)
    #[error("Encryption error: {0}")]
    CryptoError(String),

    /// Anything else (500 Internal Server Error)
    #[error("Internal server error: {0}")]
    InternalError(String),

    /// An operation-level message wrapping the underlying cause.
    ///
    /// Keeps the status of `source`; the envelope carries `message` as its
    /// message and the source text as its `error`.
    #[error("{message}")]
    Failed {
        message: String,
        source: Box<AppError>,
    },
}

impl AppError {
    /// HTTP status this error is reported with.
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) | AppError::BusinessRuleError(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::AuthenticationError(_) => StatusCode::UNAUTHORIZED,
            AppError::AuthorizationError(_) => StatusCode::FORBIDDEN,
            AppError::Failed { source, .. } => source.status(),
            AppError::DatabaseError(_) | AppError::CryptoError(_) | AppError::InternalError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Wraps this error under an operation message.
    pub fn failed(self, message: impl Into<String>) -> AppError {
        AppError::Failed {
            message: message.into(),
            source: Box::new(self),
        }
    }

    /// Text placed in the envelope's `error` field.
    ///
    /// Ledger rule violations repeat their message there, as clients of the
    /// original API expect; other direct variants leave it empty.
    fn detail(&self) -> Option<String> {
        match self {
            AppError::Failed { source, .. } => Some(source.to_string()),
            AppError::BusinessRuleError(message) => Some(message.clone()),
            _ => None,
        }
    }

    fn is_server_error(&self) -> bool {
        self.status().is_server_error()
    }
}

impl actix_web::ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        self.status()
    }

    /// Renders the error in the response envelope.
    fn error_response(&self) -> HttpResponse {
        ApiResponse::failure(self.status(), self.to_string(), self.detail())
    }
}

/// Convenience result alias
pub type AppResult<T> = Result<T, AppError>;

/// Extension trait converting foreign library errors into `AppError`.
pub trait ErrorContext<T> {
    /// Converts the error with a context message.
    fn context(self, msg: &str) -> AppResult<T>;

    /// Converts the error with a lazily built context message.
    fn with_context<F>(self, f: F) -> AppResult<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ErrorContext<T> for Result<T, E>
where
    E: std::fmt::Display,
{
    fn context(self, msg: &str) -> AppResult<T> {
        self.map_err(|e| AppError::InternalError(format!("{}: {}", msg, e)))
    }

    fn with_context<F>(self, f: F) -> AppResult<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| AppError::InternalError(format!("{}: {}", f(), e)))
    }
}

/// Attaches an operation message to server-side failures.
///
/// Client errors (4xx) pass through untouched because their own message is
/// already what the caller should see ("Account not found", ...).
pub trait OperationContext<T> {
    fn fail_with(self, message: &str) -> AppResult<T>;
}

impl<T> OperationContext<T> for AppResult<T> {
    fn fail_with(self, message: &str) -> AppResult<T> {
        self.map_err(|e| {
            if e.is_server_error() {
                log::error!("{}: {}", message, e);
                e.failed(message)
            } else {
                e
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::ResponseError;
    use actix_web::body::to_bytes;

    async fn envelope(error: AppError) -> serde_json::Value {
        let response = error.error_response();
        let body = to_bytes(response.into_body()).await.unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[test]
    fn test_validation_error_response() {
        let error = AppError::ValidationError("Email is required".to_string());
        let response = error.error_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_business_rule_error_response() {
        let error = AppError::BusinessRuleError("Insufficient balance".to_string());

        assert_eq!(error.error_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_not_found_error_response() {
        let error = AppError::NotFound("Account not found".to_string());

        assert_eq!(error.error_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_authentication_error_response() {
        let error = AppError::AuthenticationError("Invalid password".to_string());

        assert_eq!(error.error_response().status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_authorization_error_response() {
        let error = AppError::AuthorizationError("Unauthorized to deposit into this account".to_string());

        assert_eq!(error.error_response().status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_internal_error_response() {
        let error = AppError::InternalError("Something went wrong".to_string());

        assert_eq!(error.error_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_failed_keeps_source_status() {
        let error = AppError::ValidationError("Invalid data type for balance".to_string())
            .failed("Failed to add account, invalid data type.");

        assert_eq!(error.status(), StatusCode::BAD_REQUEST);
        assert_eq!(error.to_string(), "Failed to add account, invalid data type.");
    }

    #[actix_web::test]
    async fn test_envelope_shape() {
        let body = envelope(AppError::NotFound("Account not found".to_string())).await;

        assert_eq!(body["message"], "Account not found");
        assert_eq!(body["code"], 404);
        assert!(body["data"].is_null());
        assert!(body["error"].is_null());
    }

    #[actix_web::test]
    async fn test_failed_envelope_carries_cause() {
        let error = AppError::DatabaseError("connection reset".to_string()).failed("Deposit failed");
        let body = envelope(error).await;

        assert_eq!(body["message"], "Deposit failed");
        assert_eq!(body["code"], 500);
        assert_eq!(body["error"], "Database error: connection reset");
    }

    #[test]
    fn test_fail_with_only_wraps_server_errors() {
        let not_found: AppResult<()> = Err(AppError::NotFound("Account not found".to_string()));
        let wrapped = not_found.fail_with("Deposit failed").unwrap_err();
        assert!(matches!(wrapped, AppError::NotFound(_)));

        let db: AppResult<()> = Err(AppError::DatabaseError("timeout".to_string()));
        let wrapped = db.fail_with("Deposit failed").unwrap_err();
        assert!(matches!(wrapped, AppError::Failed { .. }));
    }

    #[test]
    fn test_error_context_trait() {
        let result: Result<(), &str> = Err("original error");
        let app_result = result.context("Additional context");

        assert!(app_result.is_err());
        if let Err(AppError::InternalError(msg)) = app_result {
            assert!(msg.contains("Additional context"));
            assert!(msg.contains("original error"));
        } else {
            panic!("Expected InternalError");
        }
    }
}
