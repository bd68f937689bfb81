//! Bank account creation and lookup.

use std::sync::Arc;

use crate::domain::dto::accounts::request::CreateAccountRequest;
use crate::domain::dto::common::{Page, PageRequest};
use crate::domain::entities::accounts::BankAccount;
use crate::domain::money::to_minor_units;
use crate::errors::{AppError, AppResult};
use crate::repositories::{AccountRepository, UserRepository, ACCOUNT_NOT_FOUND};

pub const ACCOUNTS_NOT_FOUND: &str = "Accounts not found";

pub struct AccountService {
    accounts: Arc<dyn AccountRepository>,
    users: Arc<dyn UserRepository>,
}

impl AccountService {
    pub fn new(accounts: Arc<dyn AccountRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { accounts, users }
    }

    /// Opens an account for an existing user with the given opening balance.
    pub async fn create_account(&self, request: CreateAccountRequest) -> AppResult<BankAccount> {
        let balance = to_minor_units(request.balance, "balance")?;
        if balance < 0 {
            return Err(AppError::ValidationError("Balance must be 0 or greater".to_string()));
        }

        let owner = self
            .users
            .find_by_id(&request.user_id)
            .await?
            .ok_or_else(|| AppError::ValidationError(format!("User {} does not exist", request.user_id)))?;

        let account = self
            .accounts
            .create(BankAccount::new(owner.id, request.bank_name, request.bank_account_number, balance))
            .await?;
        log::info!("Account {} opened for user {} with balance {}", account.id, owner.id, balance);

        Ok(account)
    }

    pub async fn get_account(&self, id: &str) -> AppResult<BankAccount> {
        self.accounts
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(ACCOUNT_NOT_FOUND.to_string()))
    }

    /// All accounts of a user; an empty result is a 404.
    pub async fn get_accounts_by_user(&self, user_id: &str) -> AppResult<Vec<BankAccount>> {
        let accounts = self.accounts.find_by_user(user_id).await?;
        if accounts.is_empty() {
            return Err(AppError::NotFound(ACCOUNTS_NOT_FOUND.to_string()));
        }
        Ok(accounts)
    }

    pub async fn list_accounts(&self, page: PageRequest) -> AppResult<Page<BankAccount>> {
        self.accounts.list(page).await
    }
}
