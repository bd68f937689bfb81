//! Bearer token authentication middleware
//!
//! Wraps the deposit and withdrawal scopes. Requests without an
//! `Authorization` header get 403 "No token provided"; a malformed header or
//! an invalid/expired token gets 401 "Unauthorized". Accepted requests carry
//! an [`AuthenticatedUser`](crate::domain::models::auth::AuthenticatedUser)
//! in their extensions.
//!
//! The token service is read from application data, so it must be
//! registered with `web::Data<TokenService>`.
//!
//! ```rust,ignore
//! web::scope("/api/v1/deposit")
//!     .wrap(AuthMiddleware::required())
//!     .service(handlers::deposits::create_deposit)
//! ```

use std::future::{ready, Ready};
use std::rc::Rc;

use actix_web::{
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    Error, Result,
};

use crate::middlewares::auth_inner::AuthMiddlewareService;

pub struct AuthMiddleware;

impl AuthMiddleware {
    pub fn required() -> Self {
        Self
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{get, http::StatusCode, test, web, App, HttpResponse};
    use serde_json::Value;

    use crate::domain::entities::users::{Profile, User};
    use crate::domain::models::auth::AuthenticatedUser;
    use crate::services::auth::TokenService;

    #[get("/whoami")]
    async fn whoami(user: AuthenticatedUser) -> HttpResponse {
        HttpResponse::Ok().body(user.user_id)
    }

    fn tokens() -> TokenService {
        TokenService::new("middleware-secret", 1)
    }

    fn user() -> User {
        User::new(
            "Alice".to_string(),
            "alice@example.com".to_string(),
            "hash".to_string(),
            Profile {
                identity_type: "KTP".to_string(),
                identity_number: "iv:ct".to_string(),
                address: "Jakarta".to_string(),
            },
        )
    }

    macro_rules! app {
        () => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new(tokens()))
                    .service(web::scope("/protected").wrap(AuthMiddleware::required()).service(whoami)),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn test_missing_header_is_forbidden() {
        let app = app!();
        let req = test::TestRequest::get().uri("/protected/whoami").to_request();
        let res = test::call_service(&app, req).await;

        assert_eq!(res.status(), StatusCode::FORBIDDEN);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["message"], "No token provided");
    }

    #[actix_web::test]
    async fn test_invalid_token_is_unauthorized() {
        let app = app!();
        for header in ["Bearer garbage", "Token abc", "Bearer "] {
            let req = test::TestRequest::get()
                .uri("/protected/whoami")
                .insert_header(("Authorization", header))
                .to_request();
            let res = test::call_service(&app, req).await;

            assert_eq!(res.status(), StatusCode::UNAUTHORIZED, "header {:?}", header);
            let body: Value = test::read_body_json(res).await;
            assert_eq!(body["message"], "Unauthorized");
        }
    }

    #[actix_web::test]
    async fn test_valid_token_attaches_user() {
        let app = app!();
        let user = user();
        let token = tokens().issue(&user).unwrap();

        let req = test::TestRequest::get()
            .uri("/protected/whoami")
            .insert_header(("Authorization", format!("Bearer {}", token)))
            .to_request();
        let body = test::call_and_read_body(&app, req).await;

        assert_eq!(body, user.id_string().as_bytes());
    }

    #[actix_web::test]
    async fn test_token_signed_with_other_secret_rejected() {
        let app = app!();
        let token = TokenService::new("another-secret", 1).issue(&user()).unwrap();

        let req = test::TestRequest::get()
            .uri("/protected/whoami")
            .insert_header(("Authorization", format!("Bearer {}", token)))
            .to_request();
        let res = test::call_service(&app, req).await;

        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }
}
