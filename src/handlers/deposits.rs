//! Deposit handlers. Every route sits behind the auth middleware.

use actix_web::http::StatusCode;
use actix_web::{get, post, web, HttpResponse};
use serde_json::Value;

use crate::domain::dto::common::ApiResponse;
use crate::domain::dto::ledger::request::DepositRequest;
use crate::domain::models::auth::AuthenticatedUser;
use crate::errors::{AppError, OperationContext};
use crate::services::ledger::LedgerService;
use crate::utils::request_body::parse_body;

#[post("")]
pub async fn create_deposit(
    service: web::Data<LedgerService>,
    caller: AuthenticatedUser,
    payload: web::Json<Value>,
) -> Result<HttpResponse, AppError> {
    let request: DepositRequest = parse_body(payload.into_inner(), &DepositRequest::SCHEMA)?;

    let deposit = service
        .deposit(request, &caller)
        .await
        .fail_with("Deposit failed")?;

    Ok(ApiResponse::success(StatusCode::CREATED, "Deposit successful", deposit))
}

#[get("/{deposit_id}")]
pub async fn get_deposit(
    service: web::Data<LedgerService>,
    deposit_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let deposit = service
        .get_deposit(&deposit_id)
        .await
        .fail_with("Failed to retrieve deposit")?;

    Ok(ApiResponse::success(StatusCode::OK, "Deposit retrieved successfully", deposit))
}

/// The path id is not consulted; the listing always covers the caller.
#[get("/user/{user_id}")]
pub async fn get_deposits_by_user(
    service: web::Data<LedgerService>,
    caller: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let deposits = service
        .deposits_for_user(&caller)
        .await
        .fail_with("Failed to retrieve deposits")?;

    Ok(ApiResponse::success(StatusCode::OK, "Deposits retrieved successfully", deposits))
}
