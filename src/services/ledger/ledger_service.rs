//! # Ledger service
//!
//! Deposits, withdrawals and account-to-account transfers, plus reads of
//! their records.
//!
//! Checks run in this order and stop at the first failure:
//!
//! | operation | checks |
//! |---|---|
//! | deposit | account exists, caller owns it |
//! | withdraw | account exists, caller owns it, balance covers amount |
//! | transfer | accounts differ, source exists, destination exists, source balance covers amount |
//!
//! Reads are not owner-restricted by id; the per-user listings always
//! describe the authenticated caller.
//!
//! The balance checks here give early, readable errors. The repository
//! repeats them atomically at write time, so a stale read under concurrent
//! requests can never overdraw an account.

use std::collections::HashMap;
use std::sync::Arc;

use mongodb::bson::oid::ObjectId;

use crate::domain::dto::common::{Page, PageRequest};
use crate::domain::dto::ledger::request::{DepositRequest, TransferRequest, WithdrawalRequest};
use crate::domain::dto::ledger::response::{DepositResponse, TransactionResponse, WithdrawalResponse};
use crate::domain::entities::accounts::BankAccount;
use crate::domain::entities::ledger::{Deposit, Transaction, Withdrawal};
use crate::domain::models::auth::AuthenticatedUser;
use crate::domain::money::to_minor_units;
use crate::errors::{AppError, AppResult};
use crate::repositories::{
    AccountRepository, LedgerRepository, ACCOUNT_NOT_FOUND, DESTINATION_ACCOUNT_NOT_FOUND,
    INSUFFICIENT_BALANCE, INSUFFICIENT_SOURCE_BALANCE, SOURCE_ACCOUNT_NOT_FOUND,
};

pub const SAME_ACCOUNT_TRANSFER: &str = "Failed to add transaction, source and destination accounts cannot be the same.";

pub struct LedgerService {
    accounts: Arc<dyn AccountRepository>,
    ledger: Arc<dyn LedgerRepository>,
}

impl LedgerService {
    pub fn new(accounts: Arc<dyn AccountRepository>, ledger: Arc<dyn LedgerRepository>) -> Self {
        Self { accounts, ledger }
    }

    pub async fn deposit(&self, request: DepositRequest, caller: &AuthenticatedUser) -> AppResult<DepositResponse> {
        let amount = to_minor_units(request.amount, "amount")?;
        let account = self.owned_account(&request.account_id, caller, "Unauthorized to deposit into this account").await?;

        let deposit = self.ledger.apply_deposit(Deposit::new(account.id, amount)).await?;
        let account = self.accounts.find_by_id(&account.id.to_hex()).await?;

        Ok(DepositResponse::new(deposit, account))
    }

    pub async fn withdraw(
        &self,
        request: WithdrawalRequest,
        caller: &AuthenticatedUser,
    ) -> AppResult<WithdrawalResponse> {
        let amount = to_minor_units(request.amount, "amount")?;
        let account = self
            .owned_account(&request.account_id, caller, "Unauthorized to withdraw from this account")
            .await?;

        if account.balance < amount {
            return Err(AppError::BusinessRuleError(INSUFFICIENT_BALANCE.to_string()));
        }

        let withdrawal = self.ledger.apply_withdrawal(Withdrawal::new(account.id, amount)).await?;
        let account = self.accounts.find_by_id(&account.id.to_hex()).await?;

        Ok(WithdrawalResponse::new(withdrawal, account))
    }

    pub async fn transfer(&self, request: TransferRequest) -> AppResult<TransactionResponse> {
        if request.source_account_id == request.destination_account_id {
            return Err(AppError::BusinessRuleError(
                "Source and destination account IDs must be different.".to_string(),
            )
            .failed(SAME_ACCOUNT_TRANSFER));
        }

        let amount = to_minor_units(request.amount, "amount")?;

        let source = self
            .accounts
            .find_by_id(&request.source_account_id)
            .await?
            .ok_or_else(|| AppError::NotFound(SOURCE_ACCOUNT_NOT_FOUND.to_string()))?;
        let destination = self
            .accounts
            .find_by_id(&request.destination_account_id)
            .await?
            .ok_or_else(|| AppError::NotFound(DESTINATION_ACCOUNT_NOT_FOUND.to_string()))?;

        if source.balance < amount {
            return Err(AppError::BusinessRuleError(INSUFFICIENT_SOURCE_BALANCE.to_string()));
        }

        let transaction = self
            .ledger
            .apply_transfer(Transaction::new(source.id, destination.id, amount))
            .await?;

        let mut accounts = self.accounts_by_id(&[source.id, destination.id]).await?;
        Ok(TransactionResponse::new(
            transaction,
            accounts.remove(&source.id),
            accounts.remove(&destination.id),
        ))
    }

    pub async fn get_deposit(&self, id: &str) -> AppResult<DepositResponse> {
        let deposit = self
            .ledger
            .find_deposit(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Deposit not found".to_string()))?;

        let account = self.accounts.find_by_id(&deposit.account_id.to_hex()).await?;
        Ok(DepositResponse::new(deposit, account))
    }

    /// Deposits into any account of the caller.
    pub async fn deposits_for_user(&self, caller: &AuthenticatedUser) -> AppResult<Vec<DepositResponse>> {
        let accounts = self.accounts_of(caller).await?;
        let ids: Vec<ObjectId> = accounts.keys().copied().collect();

        let deposits = self.ledger.deposits_for_accounts(&ids).await?;
        if deposits.is_empty() {
            return Err(AppError::NotFound("No deposits found for this user".to_string()));
        }

        Ok(deposits
            .into_iter()
            .map(|deposit| {
                let account = accounts.get(&deposit.account_id).cloned();
                DepositResponse::new(deposit, account)
            })
            .collect())
    }

    pub async fn get_withdrawal(&self, id: &str) -> AppResult<WithdrawalResponse> {
        let withdrawal = self
            .ledger
            .find_withdrawal(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Withdrawal not found".to_string()))?;

        let account = self.accounts.find_by_id(&withdrawal.account_id.to_hex()).await?;
        Ok(WithdrawalResponse::new(withdrawal, account))
    }

    /// Withdrawals from any account of the caller.
    pub async fn withdrawals_for_user(&self, caller: &AuthenticatedUser) -> AppResult<Vec<WithdrawalResponse>> {
        let accounts = self.accounts_of(caller).await?;
        let ids: Vec<ObjectId> = accounts.keys().copied().collect();

        let withdrawals = self.ledger.withdrawals_for_accounts(&ids).await?;
        if withdrawals.is_empty() {
            return Err(AppError::NotFound("No withdrawal found for this user".to_string()));
        }

        Ok(withdrawals
            .into_iter()
            .map(|withdrawal| {
                let account = accounts.get(&withdrawal.account_id).cloned();
                WithdrawalResponse::new(withdrawal, account)
            })
            .collect())
    }

    pub async fn get_transaction(&self, id: &str) -> AppResult<TransactionResponse> {
        let transaction = self
            .ledger
            .find_transaction(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Transaction not found".to_string()))?;

        let mut accounts = self
            .accounts_by_id(&[transaction.source_account_id, transaction.destination_account_id])
            .await?;
        let source = accounts.remove(&transaction.source_account_id);
        let destination = accounts.remove(&transaction.destination_account_id);

        Ok(TransactionResponse::new(transaction, source, destination))
    }

    pub async fn list_transactions(&self, page: PageRequest) -> AppResult<Page<TransactionResponse>> {
        let page = self.ledger.list_transactions(page).await?;

        let mut ids: Vec<ObjectId> = page
            .items
            .iter()
            .flat_map(|t| [t.source_account_id, t.destination_account_id])
            .collect();
        ids.sort();
        ids.dedup();
        let accounts = self.accounts_by_id(&ids).await?;

        Ok(page.map(|transaction| {
            let source = accounts.get(&transaction.source_account_id).cloned();
            let destination = accounts.get(&transaction.destination_account_id).cloned();
            TransactionResponse::new(transaction, source, destination)
        }))
    }

    async fn owned_account(&self, account_id: &str, caller: &AuthenticatedUser, forbidden: &str) -> AppResult<BankAccount> {
        let account = self
            .accounts
            .find_by_id(account_id)
            .await?
            .ok_or_else(|| AppError::NotFound(ACCOUNT_NOT_FOUND.to_string()))?;

        if !account.is_owned_by(&caller.user_id) {
            log::warn!("User {} denied access to account {}", caller.user_id, account.id);
            return Err(AppError::AuthorizationError(forbidden.to_string()));
        }
        Ok(account)
    }

    async fn accounts_of(&self, caller: &AuthenticatedUser) -> AppResult<HashMap<ObjectId, BankAccount>> {
        Ok(self
            .accounts
            .find_by_user(&caller.user_id)
            .await?
            .into_iter()
            .map(|account| (account.id, account))
            .collect())
    }

    async fn accounts_by_id(&self, ids: &[ObjectId]) -> AppResult<HashMap<ObjectId, BankAccount>> {
        Ok(self
            .accounts
            .find_many(ids)
            .await?
            .into_iter()
            .map(|account| (account.id, account))
            .collect())
    }
}
