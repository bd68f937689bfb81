//! Withdrawal handlers. Every route sits behind the auth middleware.
//!
//! Single withdrawals live under `/api/v1/withdrawal`, the per-user list
//! under `/api/v1/withdrawals/user/{user_id}`.

use actix_web::http::StatusCode;
use actix_web::{get, post, web, HttpResponse};
use serde_json::Value;

use crate::domain::dto::common::ApiResponse;
use crate::domain::dto::ledger::request::WithdrawalRequest;
use crate::domain::models::auth::AuthenticatedUser;
use crate::errors::{AppError, OperationContext};
use crate::services::ledger::LedgerService;
use crate::utils::request_body::parse_body;

#[post("")]
pub async fn create_withdrawal(
    service: web::Data<LedgerService>,
    caller: AuthenticatedUser,
    payload: web::Json<Value>,
) -> Result<HttpResponse, AppError> {
    let request: WithdrawalRequest = parse_body(payload.into_inner(), &WithdrawalRequest::SCHEMA)?;

    let withdrawal = service
        .withdraw(request, &caller)
        .await
        .fail_with("Withdrawal failed")?;

    Ok(ApiResponse::success(StatusCode::CREATED, "Withdrawal successful", withdrawal))
}

#[get("/{withdrawal_id}")]
pub async fn get_withdrawal(
    service: web::Data<LedgerService>,
    withdrawal_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let withdrawal = service
        .get_withdrawal(&withdrawal_id)
        .await
        .fail_with("Failed to retrieve withdrawal")?;

    Ok(ApiResponse::success(StatusCode::OK, "Withdrawal retrieved successfully", withdrawal))
}

/// The path id is not consulted; the listing always covers the caller.
#[get("/user/{user_id}")]
pub async fn get_withdrawals_by_user(
    service: web::Data<LedgerService>,
    caller: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let withdrawals = service
        .withdrawals_for_user(&caller)
        .await
        .fail_with("Failed to retrieve withdrawals")?;

    Ok(ApiResponse::success(StatusCode::OK, "Withdrawals retrieved successfully", withdrawals))
}
