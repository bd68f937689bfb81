use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

/// A recorded deposit. `amount` is in minor units and positive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Deposit {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub account_id: ObjectId,
    pub amount: i64,
    pub created_at: DateTime,
}

impl Deposit {
    pub fn new(account_id: ObjectId, amount: i64) -> Self {
        Self {
            id: ObjectId::new(),
            account_id,
            amount,
            created_at: DateTime::now(),
        }
    }
}
