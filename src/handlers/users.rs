//! # User handlers
//!
//! | Method | Path | Success |
//! |--------|------|---------|
//! | `POST` | `/api/v1/user` | 201 |
//! | `GET` | `/api/v1/users?page&limit` | 200 |
//! | `GET` | `/api/v1/user/{user_id}` | 200 |
//!
//! Responses carry the decrypted identity number and never the password
//! hash.

use actix_web::http::StatusCode;
use actix_web::{get, post, web, HttpResponse};
use serde_json::Value;

use crate::domain::dto::common::{ApiResponse, PageQuery};
use crate::domain::dto::users::request::CreateUserRequest;
use crate::domain::dto::users::response::UserPage;
use crate::errors::{AppError, OperationContext};
use crate::services::users::UserService;
use crate::utils::request_body::parse_body;

#[post("")]
pub async fn create_user(
    service: web::Data<UserService>,
    payload: web::Json<Value>,
) -> Result<HttpResponse, AppError> {
    let request: CreateUserRequest = parse_body(payload.into_inner(), &CreateUserRequest::SCHEMA)?;

    let user = service
        .create_user(request)
        .await
        .fail_with("Failed to add user")?;

    Ok(ApiResponse::success(StatusCode::CREATED, "User added successfully", user))
}

#[get("")]
pub async fn list_users(
    service: web::Data<UserService>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse, AppError> {
    let page = service
        .list_users(query.into_inner().into())
        .await
        .fail_with("Failed to retrieve users")?;

    Ok(ApiResponse::success(StatusCode::OK, "Users retrieved successfully", UserPage::from(page)))
}

#[get("/{user_id}")]
pub async fn get_user(
    service: web::Data<UserService>,
    user_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let user = service
        .get_user_by_id(&user_id)
        .await
        .fail_with("Failed to retrieve user")?;

    Ok(ApiResponse::success(StatusCode::OK, "User retrieved successfully", user))
}
