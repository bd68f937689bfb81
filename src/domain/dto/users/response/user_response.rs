use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::dto::common::{to_utc, Page, PageMeta};
use crate::domain::entities::users::user::User;

/// User as returned to clients. Never includes the password hash; the
/// identity number is the decrypted value.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub profile: ProfileResponse,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub identity_type: String,
    pub identity_number: String,
    pub address: String,
}

impl UserResponse {
    /// Builds the response from a stored user and its decrypted identity
    /// number.
    pub fn from_user(user: User, identity_number: String) -> Self {
        let User {
            id,
            name,
            email,
            profile,
            created_at,
            ..
        } = user;

        Self {
            id: id.to_hex(),
            name,
            email,
            profile: ProfileResponse {
                identity_type: profile.identity_type,
                identity_number,
                address: profile.address,
            },
            created_at: to_utc(created_at),
        }
    }
}

/// `GET /users` payload.
#[derive(Debug, Clone, Serialize)]
pub struct UserPage {
    pub users: Vec<UserResponse>,
    #[serde(flatten)]
    pub meta: PageMeta,
}

impl From<Page<UserResponse>> for UserPage {
    fn from(page: Page<UserResponse>) -> Self {
        let meta = PageMeta::from(&page);
        Self { users: page.items, meta }
    }
}

/// `POST /login` payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}
