//! Data access layer
//!
//! Services talk to storage only through the traits below. Two
//! implementations exist:
//!
//! - MongoDB (`users`, `accounts`, `ledger` submodules) for deployments
//! - [`MemoryStore`](memory::MemoryStore) for development and tests
//!
//! Ledger mutations (`apply_*`) are the only multi-document writes. Each one
//! changes balances and inserts its record as a single all-or-nothing unit,
//! and re-checks `balance >= amount` at write time so concurrent requests
//! cannot overdraw an account.
//!
//! # Examples
//!
//! ```rust,ignore
//! use crate::repositories::Repositories;
//!
//! let repositories = Repositories::mongo(Arc::new(database));
//! let user = repositories.users.find_by_email("user@example.com").await?;
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;

use crate::db::Database;
use crate::domain::dto::common::{Page, PageRequest};
use crate::domain::entities::accounts::BankAccount;
use crate::domain::entities::ledger::{Deposit, Transaction, Withdrawal};
use crate::domain::entities::users::User;
use crate::errors::AppResult;

pub mod accounts;
pub mod ledger;
pub mod memory;
pub mod users;

mod mongo_support;

use accounts::account_repo::MongoAccountRepository;
use ledger::ledger_repo::MongoLedgerRepository;
use memory::MemoryStore;
use users::user_repo::MongoUserRepository;

pub const ACCOUNT_NOT_FOUND: &str = "Account not found";
pub const SOURCE_ACCOUNT_NOT_FOUND: &str = "Source account not found";
pub const DESTINATION_ACCOUNT_NOT_FOUND: &str = "Destination account not found";
pub const INSUFFICIENT_BALANCE: &str = "Insufficient balance";
pub const INSUFFICIENT_SOURCE_BALANCE: &str = "Insufficient balance in source account";
pub const EMAIL_TAKEN: &str = "Email is already registered";

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Inserts a user; fails with `ValidationError` if the email is taken.
    async fn create(&self, user: User) -> AppResult<User>;

    async fn find_by_id(&self, id: &str) -> AppResult<Option<User>>;

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Newest first.
    async fn list(&self, page: PageRequest) -> AppResult<Page<User>>;
}

#[async_trait]
pub trait AccountRepository: Send + Sync {
    async fn create(&self, account: BankAccount) -> AppResult<BankAccount>;

    async fn find_by_id(&self, id: &str) -> AppResult<Option<BankAccount>>;

    /// Accounts whose id is in `ids`; unknown ids are skipped.
    async fn find_many(&self, ids: &[ObjectId]) -> AppResult<Vec<BankAccount>>;

    async fn find_by_user(&self, user_id: &str) -> AppResult<Vec<BankAccount>>;

    /// Newest first.
    async fn list(&self, page: PageRequest) -> AppResult<Page<BankAccount>>;
}

#[async_trait]
pub trait LedgerRepository: Send + Sync {
    /// Credits the account and records the deposit.
    async fn apply_deposit(&self, deposit: Deposit) -> AppResult<Deposit>;

    /// Debits the account if it still holds `amount` and records the
    /// withdrawal; otherwise `BusinessRuleError(INSUFFICIENT_BALANCE)`.
    async fn apply_withdrawal(&self, withdrawal: Withdrawal) -> AppResult<Withdrawal>;

    /// Debits the source, credits the destination and records the
    /// transaction. Nothing is written unless all three succeed.
    async fn apply_transfer(&self, transaction: Transaction) -> AppResult<Transaction>;

    async fn find_deposit(&self, id: &str) -> AppResult<Option<Deposit>>;

    async fn deposits_for_accounts(&self, account_ids: &[ObjectId]) -> AppResult<Vec<Deposit>>;

    async fn find_withdrawal(&self, id: &str) -> AppResult<Option<Withdrawal>>;

    async fn withdrawals_for_accounts(&self, account_ids: &[ObjectId]) -> AppResult<Vec<Withdrawal>>;

    async fn find_transaction(&self, id: &str) -> AppResult<Option<Transaction>>;

    /// Newest first.
    async fn list_transactions(&self, page: PageRequest) -> AppResult<Page<Transaction>>;
}

/// The repository set handed to the services.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub accounts: Arc<dyn AccountRepository>,
    pub ledger: Arc<dyn LedgerRepository>,
}

impl Repositories {
    pub fn mongo(db: Arc<Database>) -> Self {
        Self {
            users: Arc::new(MongoUserRepository::new(db.clone())),
            accounts: Arc::new(MongoAccountRepository::new(db.clone())),
            ledger: Arc::new(MongoLedgerRepository::new(db)),
        }
    }

    pub fn in_memory() -> Self {
        Self::from_memory(Arc::new(MemoryStore::new()))
    }

    /// Shares one store across all three repositories.
    pub fn from_memory(store: Arc<MemoryStore>) -> Self {
        Self {
            users: store.clone(),
            accounts: store.clone(),
            ledger: store,
        }
    }
}

/// Creates the indexes of every MongoDB collection.
pub async fn create_mongo_indexes(db: Arc<Database>) -> AppResult<()> {
    MongoUserRepository::new(db.clone()).create_indexes().await?;
    MongoAccountRepository::new(db.clone()).create_indexes().await?;
    MongoLedgerRepository::new(db).create_indexes().await
}

/// Ids arrive as path parameters; a malformed id simply matches nothing.
pub(crate) fn parse_object_id(id: &str) -> Option<ObjectId> {
    ObjectId::parse_str(id).ok()
}
