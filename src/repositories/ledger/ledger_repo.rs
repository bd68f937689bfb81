//! # Ledger repository (MongoDB)
//!
//! Collections `deposits`, `withdrawals` and `transactions`, plus the balance
//! updates on `accounts` that go with each record.
//!
//! Every `apply_*` runs inside a client session transaction:
//!
//! 1. balance change(s) with `$inc`; debits carry `balance >= amount` in the
//!    filter so the check and the write are one atomic step
//! 2. insert of the ledger record
//! 3. commit, or abort on the first error
//!
//! Concurrent writers to the same account make the loser's transaction fail
//! with a write conflict labelled `TransientTransactionError`. Such units are
//! rerun from the start after a short backoff, so the rerun sees the winner's
//! committed balance: a concurrent deposit still lands and a losing
//! withdrawal reports `Insufficient balance`. A commit that ends with
//! `UnknownTransactionCommitResult` is retried as a commit.
//!
//! Multi-document transactions need a replica set (or a sharded cluster).

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info, warn};
use mongodb::{
    bson::{doc, oid::ObjectId},
    error::{TRANSIENT_TRANSACTION_ERROR, UNKNOWN_TRANSACTION_COMMIT_RESULT},
    options::IndexOptions,
    ClientSession, Collection, IndexModel,
};

use crate::db::Database;
use crate::domain::dto::common::{Page, PageRequest};
use crate::domain::entities::accounts::BankAccount;
use crate::domain::entities::ledger::{Deposit, Transaction, Withdrawal};
use crate::errors::{AppError, AppResult};
use crate::repositories::accounts::account_repo::COLLECTION as ACCOUNTS;
use crate::repositories::mongo_support::{db_err, find_all, find_page};
use crate::repositories::{
    parse_object_id, LedgerRepository, ACCOUNT_NOT_FOUND, DESTINATION_ACCOUNT_NOT_FOUND,
    INSUFFICIENT_BALANCE, INSUFFICIENT_SOURCE_BALANCE,
};

const DEPOSITS: &str = "deposits";
const WITHDRAWALS: &str = "withdrawals";
const TRANSACTIONS: &str = "transactions";

const MAX_ATTEMPTS: u32 = 5;
const RETRY_BACKOFF: Duration = Duration::from_millis(10);

/// What to do after a driver error inside a ledger unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Retry {
    /// Abort and rerun the whole unit.
    Transaction,
    /// Send the commit again.
    Commit,
    GiveUp,
}

/// Decides from the error labels and the attempts made so far.
fn retry_for(has_label: impl Fn(&str) -> bool, attempt: u32) -> Retry {
    if attempt >= MAX_ATTEMPTS {
        Retry::GiveUp
    } else if has_label(UNKNOWN_TRANSACTION_COMMIT_RESULT) {
        Retry::Commit
    } else if has_label(TRANSIENT_TRANSACTION_ERROR) {
        Retry::Transaction
    } else {
        Retry::GiveUp
    }
}

fn retry_after(err: &mongodb::error::Error, attempt: u32) -> Retry {
    retry_for(|label| err.contains_label(label), attempt)
}

/// A ledger step either breaks a business rule or hits the driver; only the
/// latter can be retried.
enum StepError {
    Rejected(AppError),
    Driver(mongodb::error::Error),
}

impl From<mongodb::error::Error> for StepError {
    fn from(err: mongodb::error::Error) -> Self {
        StepError::Driver(err)
    }
}

/// One ledger mutation, rerunnable from scratch.
#[derive(Clone, Copy)]
enum LedgerWrite<'a> {
    Deposit(&'a Deposit),
    Withdrawal(&'a Withdrawal),
    Transfer(&'a Transaction),
}

pub struct MongoLedgerRepository {
    db: Arc<Database>,
}

impl MongoLedgerRepository {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    fn accounts(&self) -> Collection<BankAccount> {
        self.db.get_database().collection::<BankAccount>(ACCOUNTS)
    }

    fn deposits(&self) -> Collection<Deposit> {
        self.db.get_database().collection::<Deposit>(DEPOSITS)
    }

    fn withdrawals(&self) -> Collection<Withdrawal> {
        self.db.get_database().collection::<Withdrawal>(WITHDRAWALS)
    }

    fn transactions(&self) -> Collection<Transaction> {
        self.db.get_database().collection::<Transaction>(TRANSACTIONS)
    }

    pub async fn create_indexes(&self) -> AppResult<()> {
        let by_account = || {
            IndexModel::builder()
                .keys(doc! { "account_id": 1 })
                .options(IndexOptions::builder()
                    .name("account_id".to_string())
                    .build())
                .build()
        };

        self.deposits().create_index(by_account()).await.map_err(db_err)?;
        self.withdrawals().create_index(by_account()).await.map_err(db_err)?;

        Ok(())
    }

    /// Runs `write` in a session transaction, retrying transient failures.
    async fn run(&self, write: LedgerWrite<'_>) -> AppResult<()> {
        let mut session = self.db.client().start_session().await.map_err(db_err)?;
        let mut attempt = 0;

        loop {
            attempt += 1;
            session.start_transaction().await.map_err(db_err)?;

            let err = match self.steps(&mut session, write).await {
                Ok(()) => match self.commit(&mut session).await {
                    Ok(()) => return Ok(()),
                    Err(err) => err,
                },
                Err(StepError::Rejected(err)) => {
                    Self::abort(&mut session).await;
                    return Err(err);
                }
                Err(StepError::Driver(err)) => {
                    Self::abort(&mut session).await;
                    err
                }
            };

            if retry_after(&err, attempt) != Retry::Transaction {
                return Err(db_err(err));
            }
            debug!("Retrying ledger transaction after transient error (attempt {}): {}", attempt, err);
            actix_web::rt::time::sleep(RETRY_BACKOFF * attempt).await;
        }
    }

    /// Commits, resending while the outcome is unknown.
    async fn commit(&self, session: &mut ClientSession) -> Result<(), mongodb::error::Error> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            match session.commit_transaction().await {
                Ok(()) => return Ok(()),
                Err(err) if retry_after(&err, attempt) == Retry::Commit => {
                    debug!("Retrying ledger commit (attempt {}): {}", attempt, err);
                }
                Err(err) => return Err(err),
            }
        }
    }

    async fn abort(session: &mut ClientSession) {
        if let Err(abort_err) = session.abort_transaction().await {
            warn!("Failed to abort ledger transaction: {}", abort_err);
        }
    }

    async fn steps(&self, session: &mut ClientSession, write: LedgerWrite<'_>) -> Result<(), StepError> {
        match write {
            LedgerWrite::Deposit(deposit) => self.deposit_steps(session, deposit).await,
            LedgerWrite::Withdrawal(withdrawal) => self.withdrawal_steps(session, withdrawal).await,
            LedgerWrite::Transfer(transaction) => self.transfer_steps(session, transaction).await,
        }
    }

    async fn credit(
        &self,
        session: &mut ClientSession,
        account_id: ObjectId,
        amount: i64,
        missing: &str,
    ) -> Result<(), StepError> {
        let result = self
            .accounts()
            .update_one(doc! { "_id": account_id }, doc! { "$inc": { "balance": amount } })
            .session(&mut *session)
            .await?;

        if result.matched_count != 1 {
            return Err(StepError::Rejected(AppError::NotFound(missing.to_string())));
        }
        Ok(())
    }

    /// Conditional debit: matches nothing if the balance is below `amount`.
    async fn debit(
        &self,
        session: &mut ClientSession,
        account_id: ObjectId,
        amount: i64,
        insufficient: &str,
    ) -> Result<(), StepError> {
        let result = self
            .accounts()
            .update_one(
                doc! { "_id": account_id, "balance": { "$gte": amount } },
                doc! { "$inc": { "balance": -amount } },
            )
            .session(&mut *session)
            .await?;

        if result.matched_count != 1 {
            return Err(StepError::Rejected(AppError::BusinessRuleError(insufficient.to_string())));
        }
        Ok(())
    }

    async fn deposit_steps(&self, session: &mut ClientSession, deposit: &Deposit) -> Result<(), StepError> {
        self.credit(session, deposit.account_id, deposit.amount, ACCOUNT_NOT_FOUND).await?;
        self.deposits()
            .insert_one(deposit)
            .session(&mut *session)
            .await?;
        Ok(())
    }

    async fn withdrawal_steps(&self, session: &mut ClientSession, withdrawal: &Withdrawal) -> Result<(), StepError> {
        self.debit(session, withdrawal.account_id, withdrawal.amount, INSUFFICIENT_BALANCE).await?;
        self.withdrawals()
            .insert_one(withdrawal)
            .session(&mut *session)
            .await?;
        Ok(())
    }

    async fn transfer_steps(&self, session: &mut ClientSession, transaction: &Transaction) -> Result<(), StepError> {
        self.debit(
            session,
            transaction.source_account_id,
            transaction.amount,
            INSUFFICIENT_SOURCE_BALANCE,
        )
        .await?;
        self.credit(
            session,
            transaction.destination_account_id,
            transaction.amount,
            DESTINATION_ACCOUNT_NOT_FOUND,
        )
        .await?;
        self.transactions()
            .insert_one(transaction)
            .session(&mut *session)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl LedgerRepository for MongoLedgerRepository {
    async fn apply_deposit(&self, deposit: Deposit) -> AppResult<Deposit> {
        self.run(LedgerWrite::Deposit(&deposit)).await?;

        info!("Deposit {} of {} into account {}", deposit.id, deposit.amount, deposit.account_id);
        Ok(deposit)
    }

    async fn apply_withdrawal(&self, withdrawal: Withdrawal) -> AppResult<Withdrawal> {
        self.run(LedgerWrite::Withdrawal(&withdrawal)).await?;

        info!(
            "Withdrawal {} of {} from account {}",
            withdrawal.id, withdrawal.amount, withdrawal.account_id
        );
        Ok(withdrawal)
    }

    async fn apply_transfer(&self, transaction: Transaction) -> AppResult<Transaction> {
        self.run(LedgerWrite::Transfer(&transaction)).await?;

        info!(
            "Transaction {} of {} from account {} to account {}",
            transaction.id, transaction.amount, transaction.source_account_id, transaction.destination_account_id
        );
        Ok(transaction)
    }

    async fn find_deposit(&self, id: &str) -> AppResult<Option<Deposit>> {
        let Some(object_id) = parse_object_id(id) else {
            return Ok(None);
        };
        self.deposits().find_one(doc! { "_id": object_id }).await.map_err(db_err)
    }

    async fn deposits_for_accounts(&self, account_ids: &[ObjectId]) -> AppResult<Vec<Deposit>> {
        if account_ids.is_empty() {
            return Ok(Vec::new());
        }
        find_all(&self.deposits(), doc! { "account_id": { "$in": account_ids.to_vec() } }).await
    }

    async fn find_withdrawal(&self, id: &str) -> AppResult<Option<Withdrawal>> {
        let Some(object_id) = parse_object_id(id) else {
            return Ok(None);
        };
        self.withdrawals().find_one(doc! { "_id": object_id }).await.map_err(db_err)
    }

    async fn withdrawals_for_accounts(&self, account_ids: &[ObjectId]) -> AppResult<Vec<Withdrawal>> {
        if account_ids.is_empty() {
            return Ok(Vec::new());
        }
        find_all(&self.withdrawals(), doc! { "account_id": { "$in": account_ids.to_vec() } }).await
    }

    async fn find_transaction(&self, id: &str) -> AppResult<Option<Transaction>> {
        let Some(object_id) = parse_object_id(id) else {
            return Ok(None);
        };
        self.transactions().find_one(doc! { "_id": object_id }).await.map_err(db_err)
    }

    async fn list_transactions(&self, page: PageRequest) -> AppResult<Page<Transaction>> {
        find_page(&self.transactions(), page).await
    }
}
