//! Authentication handlers
//!
//! `POST /api/v1/login` exchanges email and password for a signed access
//! token. Unknown emails get 404, wrong passwords 401.

use actix_web::http::StatusCode;
use actix_web::{post, web, HttpResponse};
use serde_json::Value;

use crate::domain::dto::common::ApiResponse;
use crate::domain::dto::users::request::LoginRequest;
use crate::domain::dto::users::response::LoginResponse;
use crate::errors::{AppError, OperationContext};
use crate::services::auth::TokenService;
use crate::services::users::UserService;
use crate::utils::request_body::parse_body;

#[post("")]
pub async fn login(
    users: web::Data<UserService>,
    tokens: web::Data<TokenService>,
    payload: web::Json<Value>,
) -> Result<HttpResponse, AppError> {
    let request: LoginRequest = parse_body(payload.into_inner(), &LoginRequest::SCHEMA)?;

    let user = users
        .verify_password(&request.email, &request.password)
        .await
        .fail_with("Login failed")?;

    let token = tokens.issue(&user).fail_with("Login failed")?;
    log::info!("User {} logged in", user.id);

    Ok(ApiResponse::success(StatusCode::OK, "Login successful", LoginResponse { token }))
}
