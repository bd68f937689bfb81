//! Route table
//!
//! Each resource gets its own scope so that `/api/v1` never swallows
//! unmatched paths: anything not listed here falls through to
//! [`not_found`]. Deposit and withdrawal scopes are wrapped in
//! [`AuthMiddleware`].

use actix_web::http::StatusCode;
use actix_web::{error, web, HttpRequest, HttpResponse};
use serde_json::json;

use crate::domain::dto::common::ApiResponse;
use crate::handlers;
use crate::middlewares::AuthMiddleware;
use crate::services::AppServices;

/// Registers services, extractor error handlers and every route.
pub fn configure_app(cfg: &mut web::ServiceConfig, services: &AppServices) {
    services.register(cfg);
    cfg.app_data(web::JsonConfig::default().error_handler(json_error))
        .app_data(web::QueryConfig::default().error_handler(query_error))
        .app_data(web::PathConfig::default().error_handler(path_error));

    configure_all_routes(cfg);
}

pub fn configure_all_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(health_check);

    configure_user_routes(cfg);
    configure_auth_routes(cfg);
    configure_account_routes(cfg);
    configure_ledger_routes(cfg);
}

fn configure_user_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/user")
            .service(handlers::users::create_user)
            .service(handlers::users::get_user),
    );

    cfg.service(web::scope("/api/v1/users").service(handlers::users::list_users));
}

fn configure_auth_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/api/v1/login").service(handlers::auth::login));
}

fn configure_account_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/account")
            .service(handlers::accounts::create_account)
            .service(handlers::accounts::get_accounts_by_user)
            .service(handlers::accounts::get_account),
    );

    cfg.service(web::scope("/api/v1/accounts").service(handlers::accounts::list_accounts));
}

fn configure_ledger_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/deposit")
            .wrap(AuthMiddleware::required())
            .service(handlers::deposits::create_deposit)
            .service(handlers::deposits::get_deposits_by_user)
            .service(handlers::deposits::get_deposit),
    );

    cfg.service(
        web::scope("/api/v1/withdrawal")
            .wrap(AuthMiddleware::required())
            .service(handlers::withdrawals::create_withdrawal)
            .service(handlers::withdrawals::get_withdrawal),
    );

    cfg.service(
        web::scope("/api/v1/withdrawals")
            .wrap(AuthMiddleware::required())
            .service(handlers::withdrawals::get_withdrawals_by_user),
    );

    cfg.service(
        web::scope("/api/v1/transaction")
            .service(handlers::transactions::create_transaction)
            .service(handlers::transactions::get_transaction),
    );

    cfg.service(web::scope("/api/v1/transactions").service(handlers::transactions::list_transactions));
}

/// Fallback for unmatched routes; set with `App::default_service`.
pub async fn not_found() -> HttpResponse {
    ApiResponse::failure(StatusCode::NOT_FOUND, "Endpoint not found", None)
}

fn json_error(err: error::JsonPayloadError, _req: &HttpRequest) -> error::Error {
    let response = ApiResponse::failure(StatusCode::BAD_REQUEST, "Invalid JSON body", Some(err.to_string()));
    error::InternalError::from_response(err, response).into()
}

fn query_error(err: error::QueryPayloadError, _req: &HttpRequest) -> error::Error {
    let response = ApiResponse::failure(StatusCode::BAD_REQUEST, "Invalid query parameters", Some(err.to_string()));
    error::InternalError::from_response(err, response).into()
}

fn path_error(err: error::PathError, _req: &HttpRequest) -> error::Error {
    let response = ApiResponse::failure(StatusCode::BAD_REQUEST, "Invalid path parameters", Some(err.to_string()));
    error::InternalError::from_response(err, response).into()
}

#[actix_web::get("/health")]
async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "healthy",
        "service": "bank_service",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use actix_web::{test, App};
    use mongodb::bson::oid::ObjectId;
    use serde_json::Value;

    use crate::repositories::memory::MemoryStore;
    use crate::repositories::{AccountRepository, Repositories};
    use crate::services::auth::TokenService;
    use crate::services::crypto::FieldCipher;

    const KEY: &[u8; 32] = b"0123456789abcdef0123456789abcdef";

    fn services(store: Arc<MemoryStore>) -> AppServices {
        AppServices::new(
            Repositories::from_memory(store),
            FieldCipher::new(KEY).unwrap(),
            TokenService::new("routes-secret", 1),
            4,
        )
    }

    fn user_body(email: &str) -> Value {
        json!({
            "name": "Alice",
            "email": email,
            "password": "secret123",
            "profile": {
                "identityType": "KTP",
                "identityNumber": "1234567890123456",
                "address": "Jakarta"
            }
        })
    }

    macro_rules! app {
        ($store:expr) => {{
            let services = services($store);
            test::init_service(
                App::new()
                    .wrap(actix_web::middleware::NormalizePath::trim())
                    .configure(|cfg| configure_app(cfg, &services))
                    .default_service(web::to(not_found)),
            )
            .await
        }};
    }

    macro_rules! send {
        ($app:expr, $req:expr $(,)?) => {{
            let res = test::call_service(&$app, $req.to_request()).await;
            let status = res.status();
            let body: Value = test::read_body_json(res).await;
            (status, body)
        }};
    }

    /// Registers a user, logs in and yields (user id, bearer header).
    macro_rules! sign_up {
        ($app:expr, $email:expr) => {{
            let (status, body) = send!($app, test::TestRequest::post().uri("/api/v1/user").set_json(user_body($email)));
            assert_eq!(status, StatusCode::CREATED);
            let user_id = body["data"]["id"].as_str().unwrap().to_string();

            let (status, body) = send!(
                $app,
                test::TestRequest::post()
                    .uri("/api/v1/login")
                    .set_json(json!({ "email": $email, "password": "secret123" }))
            );
            assert_eq!(status, StatusCode::OK);
            let token = body["data"]["token"].as_str().unwrap().to_string();

            (user_id, format!("Bearer {}", token))
        }};
    }

    macro_rules! open_account {
        ($app:expr, $user_id:expr, $balance:expr) => {{
            let (status, body) = send!(
                $app,
                test::TestRequest::post().uri("/api/v1/account").set_json(json!({
                    "userId": $user_id,
                    "bankName": "BCA",
                    "bankAccountNumber": "1234567890",
                    "balance": $balance
                }))
            );
            assert_eq!(status, StatusCode::CREATED, "{}", body);
            body["data"]["id"].as_str().unwrap().to_string()
        }};
    }

    #[actix_web::test]
    async fn test_health() {
        let app = app!(Arc::new(MemoryStore::new()));
        let (status, body) = send!(app, test::TestRequest::get().uri("/health"));

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
    }

    #[actix_web::test]
    async fn test_unknown_route_is_not_found() {
        let app = app!(Arc::new(MemoryStore::new()));
        let (status, body) = send!(app, test::TestRequest::get().uri("/api/v1/nothing-here"));

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Endpoint not found");
    }

    #[actix_web::test]
    async fn test_user_create_and_read() {
        let app = app!(Arc::new(MemoryStore::new()));

        let (status, body) =
            send!(app, test::TestRequest::post().uri("/api/v1/user").set_json(user_body("a@example.com")));
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["message"], "User added successfully");
        assert_eq!(body["code"], 201);
        assert!(body["data"].get("passwordHash").is_none());
        let id = body["data"]["id"].as_str().unwrap().to_string();

        let (status, body) = send!(app, test::TestRequest::get().uri(&format!("/api/v1/user/{}", id)));
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["profile"]["identityNumber"], "1234567890123456");

        let (status, body) = send!(app, test::TestRequest::get().uri("/api/v1/users?page=1&limit=5"));
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["users"].as_array().unwrap().len(), 1);
        assert_eq!(body["data"]["totalPages"], 1);
        assert_eq!(body["data"]["currentPage"], 1);
    }

    #[actix_web::test]
    async fn test_user_body_errors() {
        let app = app!(Arc::new(MemoryStore::new()));

        let (status, body) = send!(app,
            test::TestRequest::post().uri("/api/v1/user").set_json(json!({ "name": "Alice" })),
        );
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Failed to add user, all fields are required.");

        let mut wrong_type = user_body("a@example.com");
        wrong_type["profile"]["identityNumber"] = json!(1234);
        let (status, body) = send!(app, test::TestRequest::post().uri("/api/v1/user").set_json(wrong_type));
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Failed to add user, invalid data type.");
        assert_eq!(body["error"], "Invalid data type for profile");
    }

    #[actix_web::test]
    async fn test_malformed_json_is_bad_request() {
        let app = app!(Arc::new(MemoryStore::new()));
        let req = test::TestRequest::post()
            .uri("/api/v1/user")
            .insert_header(("Content-Type", "application/json"))
            .set_payload("{not json");

        let (status, body) = send!(app, req);
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Invalid JSON body");
    }

    #[actix_web::test]
    async fn test_login_outcomes() {
        let app = app!(Arc::new(MemoryStore::new()));
        sign_up!(app, "a@example.com");

        let login = |body: Value| test::TestRequest::post().uri("/api/v1/login").set_json(body);

        let (status, _) = send!(app, login(json!({ "email": "a@example.com", "password": "nope" })));
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, body) = send!(app, login(json!({ "email": "b@example.com", "password": "x" })));
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "User not found");

        let (status, body) = send!(app, login(json!({ "email": "a@example.com" })));
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Email and password are required");
    }

    #[actix_web::test]
    async fn test_account_routes() {
        let app = app!(Arc::new(MemoryStore::new()));
        let (user_id, _) = sign_up!(app, "a@example.com");
        let account_id = open_account!(app, &user_id, 200.0);

        let (status, body) = send!(app, test::TestRequest::get().uri(&format!("/api/v1/account/{}", account_id)));
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["balance"], 200.0);

        let (status, body) =
            send!(app, test::TestRequest::get().uri(&format!("/api/v1/account/user/{}", user_id)));
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"].as_array().unwrap().len(), 1);

        let (status, _) = send!(app,
            test::TestRequest::get().uri(&format!("/api/v1/account/user/{}", ObjectId::new().to_hex())),
        );
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, body) = send!(app, test::TestRequest::get().uri("/api/v1/accounts"));
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["accounts"].as_array().unwrap().len(), 1);

        let (status, _) = send!(app, test::TestRequest::get().uri("/api/v1/accounts?page=abc"));
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_negative_opening_balance_rejected() {
        let app = app!(Arc::new(MemoryStore::new()));
        let (user_id, _) = sign_up!(app, "a@example.com");

        let (status, body) = send!(app,
            test::TestRequest::post().uri("/api/v1/account").set_json(json!({
                "userId": user_id,
                "bankName": "BCA",
                "bankAccountNumber": "1",
                "balance": -5
            })),
        );
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Failed to add account, invalid data type.");
    }

    #[actix_web::test]
    async fn test_ledger_routes_require_token() {
        let app = app!(Arc::new(MemoryStore::new()));

        let (status, body) = send!(app,
            test::TestRequest::post()
                .uri("/api/v1/deposit")
                .set_json(json!({ "accountId": "x", "amount": 1 })),
        );
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["message"], "No token provided");

        let (status, body) = send!(app,
            test::TestRequest::post()
                .uri("/api/v1/withdrawal")
                .insert_header(("Authorization", "Bearer not-a-token"))
                .set_json(json!({ "accountId": "x", "amount": 1 })),
        );
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "Unauthorized");
    }

    #[actix_web::test]
    async fn test_deposit_and_withdraw_flow() {
        let store = Arc::new(MemoryStore::new());
        let app = app!(store.clone());
        let (user_id, bearer) = sign_up!(app, "a@example.com");
        let account_id = open_account!(app, &user_id, 100.0);

        let (status, body) = send!(app,
            test::TestRequest::post()
                .uri("/api/v1/deposit")
                .insert_header(("Authorization", bearer.as_str()))
                .set_json(json!({ "accountId": account_id, "amount": 50 })),
        );
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["message"], "Deposit successful");
        let deposit_id = body["data"]["id"].as_str().unwrap().to_string();

        let (status, body) = send!(app,
            test::TestRequest::post()
                .uri("/api/v1/withdrawal")
                .insert_header(("Authorization", bearer.as_str()))
                .set_json(json!({ "accountId": account_id, "amount": 200 })),
        );
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Insufficient balance");

        let (status, body) = send!(app,
            test::TestRequest::post()
                .uri("/api/v1/withdrawal")
                .insert_header(("Authorization", bearer.as_str()))
                .set_json(json!({ "accountId": account_id, "amount": 150 })),
        );
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["data"]["account"]["balance"], 0.0);

        let account = AccountRepository::find_by_id(store.as_ref(), &account_id).await.unwrap().unwrap();
        assert_eq!(account.balance, 0);

        let (status, _) = send!(app,
            test::TestRequest::get()
                .uri(&format!("/api/v1/deposit/{}", deposit_id))
                .insert_header(("Authorization", bearer.as_str())),
        );
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send!(app,
            test::TestRequest::get()
                .uri(&format!("/api/v1/withdrawals/user/{}", user_id))
                .insert_header(("Authorization", bearer.as_str())),
        );
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"].as_array().unwrap().len(), 1);
    }

    #[actix_web::test]
    async fn test_deposit_into_foreign_account_forbidden() {
        let app = app!(Arc::new(MemoryStore::new()));
        let (owner_id, _) = sign_up!(app, "owner@example.com");
        let (_, intruder) = sign_up!(app, "intruder@example.com");
        let account_id = open_account!(app, &owner_id, 100.0);

        let (status, body) = send!(app,
            test::TestRequest::post()
                .uri("/api/v1/deposit")
                .insert_header(("Authorization", intruder.as_str()))
                .set_json(json!({ "accountId": account_id, "amount": 50 })),
        );
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["message"], "Unauthorized to deposit into this account");
    }

    #[actix_web::test]
    async fn test_deposit_listing_covers_the_caller() {
        let app = app!(Arc::new(MemoryStore::new()));
        let (owner_id, owner) = sign_up!(app, "owner@example.com");
        let (_, other) = sign_up!(app, "other@example.com");
        let account_id = open_account!(app, &owner_id, 100.0);

        let (status, body) = send!(
            app,
            test::TestRequest::post()
                .uri("/api/v1/deposit")
                .insert_header(("Authorization", owner.as_str()))
                .set_json(json!({ "accountId": account_id, "amount": 25 })),
        );
        assert_eq!(status, StatusCode::CREATED);
        let deposit_id = body["data"]["id"].as_str().unwrap().to_string();

        let (status, body) = send!(
            app,
            test::TestRequest::get()
                .uri(&format!("/api/v1/deposit/user/{}", owner_id))
                .insert_header(("Authorization", other.as_str())),
        );
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "No deposits found for this user");

        let (status, body) = send!(
            app,
            test::TestRequest::get()
                .uri(&format!("/api/v1/deposit/user/{}", ObjectId::new().to_hex()))
                .insert_header(("Authorization", owner.as_str())),
        );
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"].as_array().unwrap().len(), 1);

        let (status, body) = send!(
            app,
            test::TestRequest::get()
                .uri(&format!("/api/v1/deposit/{}", deposit_id))
                .insert_header(("Authorization", other.as_str())),
        );
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["amount"], 25.0);
    }

    #[actix_web::test]
    async fn test_transaction_routes() {
        let app = app!(Arc::new(MemoryStore::new()));
        let (user_id, _) = sign_up!(app, "a@example.com");
        let source = open_account!(app, &user_id, 500.0);
        let destination = open_account!(app, &user_id, 0.0);

        let transfer = |amount: f64, to: &str| {
            test::TestRequest::post().uri("/api/v1/transaction").set_json(json!({
                "sourceAccountId": source,
                "destinationAccountId": to,
                "amount": amount
            }))
        };

        let (status, body) = send!(app, transfer(200.0, &destination));
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["data"]["sourceAccount"]["balance"], 300.0);
        assert_eq!(body["data"]["destinationAccount"]["balance"], 200.0);
        let transaction_id = body["data"]["id"].as_str().unwrap().to_string();

        let (status, body) = send!(app, transfer(1.0, &source));
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["message"],
            "Failed to add transaction, source and destination accounts cannot be the same."
        );

        let (status, body) = send!(app, transfer(1000.0, &destination));
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Insufficient balance in source account");

        let (status, body) = send!(app, transfer(1.0, &ObjectId::new().to_hex()));
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Destination account not found");

        let (status, _) = send!(app,
            test::TestRequest::get().uri(&format!("/api/v1/transaction/{}", transaction_id)),
        );
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send!(app, test::TestRequest::get().uri("/api/v1/transactions"));
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["transactions"].as_array().unwrap().len(), 1);
    }
}
