//! # Bank account handlers
//!
//! | Method | Path | Success |
//! |--------|------|---------|
//! | `POST` | `/api/v1/account` | 201 |
//! | `GET` | `/api/v1/accounts?page&limit` | 200 |
//! | `GET` | `/api/v1/account/{account_id}` | 200 |
//! | `GET` | `/api/v1/account/user/{user_id}` | 200, 404 when the user has none |

use actix_web::http::StatusCode;
use actix_web::{get, post, web, HttpResponse};
use serde_json::Value;

use crate::domain::dto::accounts::request::CreateAccountRequest;
use crate::domain::dto::accounts::response::{AccountPage, AccountResponse};
use crate::domain::dto::common::{ApiResponse, PageQuery};
use crate::errors::{AppError, OperationContext};
use crate::services::accounts::AccountService;
use crate::utils::request_body::parse_body;

#[post("")]
pub async fn create_account(
    service: web::Data<AccountService>,
    payload: web::Json<Value>,
) -> Result<HttpResponse, AppError> {
    let request: CreateAccountRequest = parse_body(payload.into_inner(), &CreateAccountRequest::SCHEMA)?;

    let account = service
        .create_account(request)
        .await
        .fail_with("Failed to add account")?;

    Ok(ApiResponse::success(
        StatusCode::CREATED,
        "Account added successfully",
        AccountResponse::from(account),
    ))
}

#[get("")]
pub async fn list_accounts(
    service: web::Data<AccountService>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse, AppError> {
    let page = service
        .list_accounts(query.into_inner().into())
        .await
        .fail_with("Failed to retrieve accounts")?;

    Ok(ApiResponse::success(
        StatusCode::OK,
        "Accounts retrieved successfully",
        AccountPage::from(page),
    ))
}

#[get("/{account_id}")]
pub async fn get_account(
    service: web::Data<AccountService>,
    account_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let account = service
        .get_account(&account_id)
        .await
        .fail_with("Failed to retrieve account")?;

    Ok(ApiResponse::success(
        StatusCode::OK,
        "Account retrieved successfully",
        AccountResponse::from(account),
    ))
}

#[get("/user/{user_id}")]
pub async fn get_accounts_by_user(
    service: web::Data<AccountService>,
    user_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let accounts = service
        .get_accounts_by_user(&user_id)
        .await
        .fail_with("Failed to retrieve accounts")?;

    let accounts: Vec<AccountResponse> = accounts.into_iter().map(AccountResponse::from).collect();
    Ok(ApiResponse::success(StatusCode::OK, "Accounts retrieved successfully", accounts))
}
