//! # User repository (MongoDB)
//!
//! - collection `users`
//! - unique index on `email`, descending index on `created_at`
//! - the profile is embedded in the user document; its identity number is
//!   stored already encrypted, this layer never sees the plaintext

use std::sync::Arc;

use async_trait::async_trait;
use mongodb::{
    bson::doc,
    options::IndexOptions,
    Collection, IndexModel,
};

use crate::db::Database;
use crate::domain::dto::common::{Page, PageRequest};
use crate::domain::entities::users::User;
use crate::errors::{AppError, AppResult};
use crate::repositories::mongo_support::{db_err, find_page, is_duplicate_key};
use crate::repositories::{parse_object_id, UserRepository, EMAIL_TAKEN};

const COLLECTION: &str = "users";

pub struct MongoUserRepository {
    db: Arc<Database>,
}

impl MongoUserRepository {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    fn collection(&self) -> Collection<User> {
        self.db.get_database().collection::<User>(COLLECTION)
    }

    /// Creates the collection indexes; safe to run on every start.
    pub async fn create_indexes(&self) -> AppResult<()> {
        let email_index = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(IndexOptions::builder()
                .unique(true)
                .name("email_unique".to_string())
                .build())
            .build();

        let created_at_index = IndexModel::builder()
            .keys(doc! { "created_at": -1 })
            .options(IndexOptions::builder()
                .name("created_at_desc".to_string())
                .build())
            .build();

        self.collection()
            .create_indexes([email_index, created_at_index])
            .await
            .map_err(db_err)?;

        Ok(())
    }
}

#[async_trait]
impl UserRepository for MongoUserRepository {
    async fn create(&self, user: User) -> AppResult<User> {
        if self.find_by_email(&user.email).await?.is_some() {
            return Err(AppError::ValidationError(EMAIL_TAKEN.to_string()));
        }

        // The unique index still catches a concurrent insert of the same email.
        self.collection().insert_one(&user).await.map_err(|e| {
            if is_duplicate_key(&e) {
                AppError::ValidationError(EMAIL_TAKEN.to_string())
            } else {
                db_err(e)
            }
        })?;

        Ok(user)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<User>> {
        let Some(object_id) = parse_object_id(id) else {
            return Ok(None);
        };

        self.collection()
            .find_one(doc! { "_id": object_id })
            .await
            .map_err(db_err)
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        self.collection()
            .find_one(doc! { "email": email })
            .await
            .map_err(db_err)
    }

    async fn list(&self, page: PageRequest) -> AppResult<Page<User>> {
        find_page(&self.collection(), page).await
    }
}
