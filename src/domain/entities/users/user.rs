//! User entity with its embedded identity profile.

use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

/// A registered user.
///
/// `password_hash` is a bcrypt hash and `profile.identity_number` holds
/// ciphertext in the `hex(iv):hex(ct)` format; neither is ever returned to a
/// client as stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub profile: Profile,
    pub created_at: DateTime,
}

/// Identity profile, owned by exactly one user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub identity_type: String,
    /// Encrypted identity number.
    pub identity_number: String,
    pub address: String,
}

impl User {
    pub fn new(name: String, email: String, password_hash: String, profile: Profile) -> Self {
        Self {
            id: ObjectId::new(),
            name,
            email,
            password_hash,
            profile,
            created_at: DateTime::now(),
        }
    }

    pub fn id_string(&self) -> String {
        self.id.to_hex()
    }
}
