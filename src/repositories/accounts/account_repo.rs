//! Bank account repository (MongoDB, collection `accounts`).
//!
//! Balances are only ever changed by the ledger repository; this one
//! creates and reads accounts.

use std::sync::Arc;

use async_trait::async_trait;
use mongodb::{
    bson::{doc, oid::ObjectId},
    options::IndexOptions,
    Collection, IndexModel,
};

use crate::db::Database;
use crate::domain::dto::common::{Page, PageRequest};
use crate::domain::entities::accounts::BankAccount;
use crate::errors::AppResult;
use crate::repositories::mongo_support::{db_err, find_all, find_page};
use crate::repositories::{parse_object_id, AccountRepository};

pub(crate) const COLLECTION: &str = "accounts";

pub struct MongoAccountRepository {
    db: Arc<Database>,
}

impl MongoAccountRepository {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    fn collection(&self) -> Collection<BankAccount> {
        self.db.get_database().collection::<BankAccount>(COLLECTION)
    }

    pub async fn create_indexes(&self) -> AppResult<()> {
        let user_index = IndexModel::builder()
            .keys(doc! { "user_id": 1 })
            .options(IndexOptions::builder()
                .name("user_id".to_string())
                .build())
            .build();

        self.collection()
            .create_indexes([user_index])
            .await
            .map_err(db_err)?;

        Ok(())
    }
}

#[async_trait]
impl AccountRepository for MongoAccountRepository {
    async fn create(&self, account: BankAccount) -> AppResult<BankAccount> {
        self.collection().insert_one(&account).await.map_err(db_err)?;
        Ok(account)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<BankAccount>> {
        let Some(object_id) = parse_object_id(id) else {
            return Ok(None);
        };

        self.collection()
            .find_one(doc! { "_id": object_id })
            .await
            .map_err(db_err)
    }

    async fn find_many(&self, ids: &[ObjectId]) -> AppResult<Vec<BankAccount>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        find_all(&self.collection(), doc! { "_id": { "$in": ids.to_vec() } }).await
    }

    async fn find_by_user(&self, user_id: &str) -> AppResult<Vec<BankAccount>> {
        let Some(user_id) = parse_object_id(user_id) else {
            return Ok(Vec::new());
        };
        find_all(&self.collection(), doc! { "user_id": user_id }).await
    }

    async fn list(&self, page: PageRequest) -> AppResult<Page<BankAccount>> {
        find_page(&self.collection(), page).await
    }
}
