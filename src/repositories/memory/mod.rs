//! In-memory storage for development and testing.
//!
//! Implements all three repository traits over one mutex-guarded state.
//! Every write is a unit of work: balance changes are journaled as they are
//! applied, and if the unit fails the journal is replayed backwards and the
//! records it appended are truncated away. A failed transfer leaves no
//! partial debit behind. Data is lost on restart.

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use log::info;
use mongodb::bson::oid::ObjectId;

use crate::domain::dto::common::{Page, PageRequest};
use crate::domain::entities::accounts::BankAccount;
use crate::domain::entities::ledger::{Deposit, Transaction, Withdrawal};
use crate::domain::entities::users::User;
use crate::errors::{AppError, AppResult};
use crate::repositories::{
    parse_object_id, AccountRepository, LedgerRepository, UserRepository, ACCOUNT_NOT_FOUND,
    DESTINATION_ACCOUNT_NOT_FOUND, EMAIL_TAKEN, INSUFFICIENT_BALANCE, INSUFFICIENT_SOURCE_BALANCE,
    SOURCE_ACCOUNT_NOT_FOUND,
};

#[derive(Debug, Default)]
struct State {
    users: Vec<User>,
    accounts: Vec<BankAccount>,
    deposits: Vec<Deposit>,
    withdrawals: Vec<Withdrawal>,
    transactions: Vec<Transaction>,
    /// Previous balances changed by the unit of work in progress.
    journal: Vec<(ObjectId, i64)>,
}

/// Collection lengths at the start of a unit of work.
#[derive(Debug, Clone, Copy)]
struct Mark {
    users: usize,
    accounts: usize,
    deposits: usize,
    withdrawals: usize,
    transactions: usize,
}

impl State {
    fn mark(&self) -> Mark {
        Mark {
            users: self.users.len(),
            accounts: self.accounts.len(),
            deposits: self.deposits.len(),
            withdrawals: self.withdrawals.len(),
            transactions: self.transactions.len(),
        }
    }

    fn rollback(&mut self, mark: Mark) {
        while let Some((id, balance)) = self.journal.pop() {
            if let Some(account) = self.accounts.iter_mut().find(|a| a.id == id) {
                account.balance = balance;
            }
        }
        self.users.truncate(mark.users);
        self.accounts.truncate(mark.accounts);
        self.deposits.truncate(mark.deposits);
        self.withdrawals.truncate(mark.withdrawals);
        self.transactions.truncate(mark.transactions);
    }

    fn adjust(&mut self, id: ObjectId, missing: &str, change: impl FnOnce(i64) -> AppResult<i64>) -> AppResult<()> {
        let account = self
            .accounts
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| AppError::NotFound(missing.to_string()))?;
        let balance = change(account.balance)?;
        self.journal.push((id, account.balance));
        account.balance = balance;
        Ok(())
    }

    fn credit(&mut self, id: ObjectId, amount: i64, missing: &str) -> AppResult<()> {
        self.adjust(id, missing, |balance| {
            balance
                .checked_add(amount)
                .ok_or_else(|| AppError::BusinessRuleError("Balance overflow".to_string()))
        })
    }

    fn debit(&mut self, id: ObjectId, amount: i64, missing: &str, insufficient: &str) -> AppResult<()> {
        self.adjust(id, missing, |balance| {
            if balance < amount {
                return Err(AppError::BusinessRuleError(insufficient.to_string()));
            }
            Ok(balance - amount)
        })
    }
}

/// Mutex-guarded store shared by the three in-memory repositories.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<State>,
    failing_credits: Mutex<HashSet<ObjectId>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every later credit to `account_id` fail after the debit side of
    /// the unit has already been applied. Used to exercise rollback.
    pub fn fail_credits_to(&self, account_id: ObjectId) {
        if let Ok(mut failing) = self.failing_credits.lock() {
            failing.insert(account_id);
        }
    }

    fn lock(&self) -> AppResult<MutexGuard<'_, State>> {
        self.state
            .lock()
            .map_err(|_| AppError::InternalError("memory store lock poisoned".to_string()))
    }

    fn read<T>(&self, f: impl FnOnce(&State) -> T) -> AppResult<T> {
        let state = self.lock()?;
        Ok(f(&state))
    }

    /// Runs `f` as one unit of work, undone entirely if it fails.
    fn write<T>(&self, f: impl FnOnce(&mut State) -> AppResult<T>) -> AppResult<T> {
        let mut state = self.lock()?;
        let mark = state.mark();
        let outcome = f(&mut state);
        if outcome.is_err() {
            state.rollback(mark);
        }
        state.journal.clear();
        outcome
    }

    fn credit_fails(&self, account_id: ObjectId) -> bool {
        self.failing_credits
            .lock()
            .map(|failing| failing.contains(&account_id))
            .unwrap_or(false)
    }
}

fn page_of<T: Clone>(items: &[T], page: PageRequest) -> Page<T> {
    Page {
        items: items
            .iter()
            .rev()
            .skip(page.skip() as usize)
            .take(page.limit as usize)
            .cloned()
            .collect(),
        total: items.len() as u64,
        request: page,
    }
}

fn find_by_hex<T: Clone>(items: &[T], id: &str, key: impl Fn(&T) -> ObjectId) -> Option<T> {
    let id = parse_object_id(id)?;
    items.iter().find(|item| key(item) == id).cloned()
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn create(&self, user: User) -> AppResult<User> {
        self.write(|state| {
            if state.users.iter().any(|u| u.email == user.email) {
                return Err(AppError::ValidationError(EMAIL_TAKEN.to_string()));
            }
            state.users.push(user.clone());
            Ok(user)
        })
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<User>> {
        self.read(|state| find_by_hex(&state.users, id, |u| u.id))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        self.read(|state| state.users.iter().find(|u| u.email == email).cloned())
    }

    async fn list(&self, page: PageRequest) -> AppResult<Page<User>> {
        self.read(|state| page_of(&state.users, page))
    }
}

#[async_trait]
impl AccountRepository for MemoryStore {
    async fn create(&self, account: BankAccount) -> AppResult<BankAccount> {
        self.write(|state| {
            state.accounts.push(account.clone());
            Ok(account)
        })
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<BankAccount>> {
        self.read(|state| find_by_hex(&state.accounts, id, |a| a.id))
    }

    async fn find_many(&self, ids: &[ObjectId]) -> AppResult<Vec<BankAccount>> {
        self.read(|state| {
            state
                .accounts
                .iter()
                .rev()
                .filter(|a| ids.contains(&a.id))
                .cloned()
                .collect()
        })
    }

    async fn find_by_user(&self, user_id: &str) -> AppResult<Vec<BankAccount>> {
        let Some(user_id) = parse_object_id(user_id) else {
            return Ok(Vec::new());
        };
        self.read(|state| {
            state
                .accounts
                .iter()
                .rev()
                .filter(|a| a.user_id == user_id)
                .cloned()
                .collect()
        })
    }

    async fn list(&self, page: PageRequest) -> AppResult<Page<BankAccount>> {
        self.read(|state| page_of(&state.accounts, page))
    }
}

#[async_trait]
impl LedgerRepository for MemoryStore {
    async fn apply_deposit(&self, deposit: Deposit) -> AppResult<Deposit> {
        let deposit = self.write(|state| {
            state.credit(deposit.account_id, deposit.amount, ACCOUNT_NOT_FOUND)?;
            state.deposits.push(deposit.clone());
            Ok(deposit)
        })?;

        info!("Deposit {} of {} into account {}", deposit.id, deposit.amount, deposit.account_id);
        Ok(deposit)
    }

    async fn apply_withdrawal(&self, withdrawal: Withdrawal) -> AppResult<Withdrawal> {
        let withdrawal = self.write(|state| {
            state.debit(withdrawal.account_id, withdrawal.amount, ACCOUNT_NOT_FOUND, INSUFFICIENT_BALANCE)?;
            state.withdrawals.push(withdrawal.clone());
            Ok(withdrawal)
        })?;

        info!(
            "Withdrawal {} of {} from account {}",
            withdrawal.id, withdrawal.amount, withdrawal.account_id
        );
        Ok(withdrawal)
    }

    async fn apply_transfer(&self, transaction: Transaction) -> AppResult<Transaction> {
        let credit_fails = self.credit_fails(transaction.destination_account_id);

        let transaction = self.write(|state| {
            state.debit(
                transaction.source_account_id,
                transaction.amount,
                SOURCE_ACCOUNT_NOT_FOUND,
                INSUFFICIENT_SOURCE_BALANCE,
            )?;
            if credit_fails {
                return Err(AppError::DatabaseError("injected credit failure".to_string()));
            }
            state.credit(transaction.destination_account_id, transaction.amount, DESTINATION_ACCOUNT_NOT_FOUND)?;
            state.transactions.push(transaction.clone());
            Ok(transaction)
        })?;

        info!(
            "Transaction {} of {} from account {} to account {}",
            transaction.id, transaction.amount, transaction.source_account_id, transaction.destination_account_id
        );
        Ok(transaction)
    }

    async fn find_deposit(&self, id: &str) -> AppResult<Option<Deposit>> {
        self.read(|state| find_by_hex(&state.deposits, id, |d| d.id))
    }

    async fn deposits_for_accounts(&self, account_ids: &[ObjectId]) -> AppResult<Vec<Deposit>> {
        self.read(|state| {
            state
                .deposits
                .iter()
                .rev()
                .filter(|d| account_ids.contains(&d.account_id))
                .cloned()
                .collect()
        })
    }

    async fn find_withdrawal(&self, id: &str) -> AppResult<Option<Withdrawal>> {
        self.read(|state| find_by_hex(&state.withdrawals, id, |w| w.id))
    }

    async fn withdrawals_for_accounts(&self, account_ids: &[ObjectId]) -> AppResult<Vec<Withdrawal>> {
        self.read(|state| {
            state
                .withdrawals
                .iter()
                .rev()
                .filter(|w| account_ids.contains(&w.account_id))
                .cloned()
                .collect()
        })
    }

    async fn find_transaction(&self, id: &str) -> AppResult<Option<Transaction>> {
        self.read(|state| find_by_hex(&state.transactions, id, |t| t.id))
    }

    async fn list_transactions(&self, page: PageRequest) -> AppResult<Page<Transaction>> {
        self.read(|state| page_of(&state.transactions, page))
    }
}
