use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

/// A transfer between two distinct accounts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub source_account_id: ObjectId,
    pub destination_account_id: ObjectId,
    pub amount: i64,
    pub created_at: DateTime,
}

impl Transaction {
    pub fn new(source_account_id: ObjectId, destination_account_id: ObjectId, amount: i64) -> Self {
        Self {
            id: ObjectId::new(),
            source_account_id,
            destination_account_id,
            amount,
            created_at: DateTime::now(),
        }
    }
}
