//! Bank account entity.

use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

/// A bank account owned by one user.
///
/// `balance` is in minor units and never negative; it is changed only by
/// the ledger operations through atomic increments/decrements.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BankAccount {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub user_id: ObjectId,
    pub bank_name: String,
    pub bank_account_number: String,
    pub balance: i64,
    pub created_at: DateTime,
}

impl BankAccount {
    pub fn new(user_id: ObjectId, bank_name: String, bank_account_number: String, balance: i64) -> Self {
        Self {
            id: ObjectId::new(),
            user_id,
            bank_name,
            bank_account_number,
            balance,
            created_at: DateTime::now(),
        }
    }

    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.user_id.to_hex() == user_id
    }
}
