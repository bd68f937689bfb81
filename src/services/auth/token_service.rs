//! JWT access tokens
//!
//! HS256-signed tokens carrying the user id (`sub`) and email. Issued at
//! login, checked by the auth middleware on protected routes.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};

use crate::config::JwtConfig;
use crate::domain::entities::users::User;
use crate::domain::models::token::TokenClaims;
use crate::errors::AppError;

const BEARER_PREFIX: &str = "Bearer ";

#[derive(Clone)]
pub struct TokenService {
    secret: String,
    expiration_hours: i64,
}

impl TokenService {
    pub fn new(secret: impl Into<String>, expiration_hours: i64) -> Self {
        Self {
            secret: secret.into(),
            expiration_hours,
        }
    }

    /// `JWT_SECRET` / `JWT_EXPIRATION_HOURS`.
    pub fn from_config() -> Self {
        Self::new(JwtConfig::secret(), JwtConfig::expiration_hours())
    }

    pub fn issue(&self, user: &User) -> Result<String, AppError> {
        let now = Utc::now();
        let expiration = now + Duration::hours(self.expiration_hours);

        let claims = TokenClaims {
            sub: user.id_string(),
            email: user.email.clone(),
            iat: now.timestamp(),
            exp: expiration.timestamp(),
        };

        encode(&Header::default(), &claims, &EncodingKey::from_secret(self.secret.as_ref()))
            .map_err(|e| AppError::InternalError(format!("Failed to sign token: {}", e)))
    }

    /// Any decoding failure (bad signature, expired, garbage) is a 401.
    pub fn verify(&self, token: &str) -> Result<TokenClaims, AppError> {
        decode::<TokenClaims>(
            token,
            &DecodingKey::from_secret(self.secret.as_ref()),
            &Validation::default(),
        )
        .map(|data| data.claims)
        .map_err(|e| {
            log::warn!("Rejected token: {}", e);
            AppError::AuthenticationError("Unauthorized".to_string())
        })
    }

    pub fn extract_bearer_token<'a>(&self, auth_header: &'a str) -> Result<&'a str, AppError> {
        auth_header
            .strip_prefix(BEARER_PREFIX)
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| AppError::AuthenticationError("Unauthorized".to_string()))
    }
}
