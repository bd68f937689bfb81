//! Transfer handlers
//!
//! `POST /api/v1/transaction` moves funds between two accounts as one
//! all-or-nothing unit; `GET /api/v1/transactions` and
//! `GET /api/v1/transaction/{id}` read the records back with both accounts
//! embedded.

use actix_web::http::StatusCode;
use actix_web::{get, post, web, HttpResponse};
use serde_json::Value;

use crate::domain::dto::common::{ApiResponse, PageQuery};
use crate::domain::dto::ledger::request::TransferRequest;
use crate::domain::dto::ledger::response::TransactionPage;
use crate::errors::{AppError, OperationContext};
use crate::services::ledger::LedgerService;
use crate::utils::request_body::parse_body;

#[post("")]
pub async fn create_transaction(
    service: web::Data<LedgerService>,
    payload: web::Json<Value>,
) -> Result<HttpResponse, AppError> {
    let request: TransferRequest = parse_body(payload.into_inner(), &TransferRequest::SCHEMA)?;

    let transaction = service
        .transfer(request)
        .await
        .fail_with("Failed to add transaction")?;

    Ok(ApiResponse::success(StatusCode::CREATED, "Transaction added successfully", transaction))
}

#[get("")]
pub async fn list_transactions(
    service: web::Data<LedgerService>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse, AppError> {
    let page = service
        .list_transactions(query.into_inner().into())
        .await
        .fail_with("Failed to retrieve transactions")?;

    Ok(ApiResponse::success(
        StatusCode::OK,
        "Transactions retrieved successfully",
        TransactionPage::from(page),
    ))
}

#[get("/{transaction_id}")]
pub async fn get_transaction(
    service: web::Data<LedgerService>,
    transaction_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let transaction = service
        .get_transaction(&transaction_id)
        .await
        .fail_with("Failed to retrieve transaction")?;

    Ok(ApiResponse::success(StatusCode::OK, "Transaction retrieved successfully", transaction))
}
