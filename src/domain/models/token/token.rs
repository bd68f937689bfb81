use serde::{Deserialize, Serialize};

/// Claims of an access token issued at login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// User id (hex ObjectId).
    pub sub: String,
    pub email: String,
    pub iat: i64,
    pub exp: i64,
}
