use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::dto::accounts::response::AccountResponse;
use crate::domain::dto::common::{to_utc, Page, PageMeta};
use crate::domain::entities::accounts::account::BankAccount;
use crate::domain::entities::ledger::{Deposit, Transaction, Withdrawal};
use crate::domain::money::from_minor_units;

/// A deposit, optionally with the account it went into.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepositResponse {
    pub id: String,
    pub account_id: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account: Option<AccountResponse>,
}

impl DepositResponse {
    pub fn new(deposit: Deposit, account: Option<BankAccount>) -> Self {
        Self {
            id: deposit.id.to_hex(),
            account_id: deposit.account_id.to_hex(),
            amount: from_minor_units(deposit.amount),
            created_at: to_utc(deposit.created_at),
            account: account.map(AccountResponse::from),
        }
    }
}

/// A withdrawal, optionally with the account it came from.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawalResponse {
    pub id: String,
    pub account_id: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account: Option<AccountResponse>,
}

impl WithdrawalResponse {
    pub fn new(withdrawal: Withdrawal, account: Option<BankAccount>) -> Self {
        Self {
            id: withdrawal.id.to_hex(),
            account_id: withdrawal.account_id.to_hex(),
            amount: from_minor_units(withdrawal.amount),
            created_at: to_utc(withdrawal.created_at),
            account: account.map(AccountResponse::from),
        }
    }
}

/// A transfer with both accounts as they are at read time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionResponse {
    pub id: String,
    pub source_account_id: String,
    pub destination_account_id: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_account: Option<AccountResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination_account: Option<AccountResponse>,
}

impl TransactionResponse {
    pub fn new(
        transaction: Transaction,
        source_account: Option<BankAccount>,
        destination_account: Option<BankAccount>,
    ) -> Self {
        Self {
            id: transaction.id.to_hex(),
            source_account_id: transaction.source_account_id.to_hex(),
            destination_account_id: transaction.destination_account_id.to_hex(),
            amount: from_minor_units(transaction.amount),
            created_at: to_utc(transaction.created_at),
            source_account: source_account.map(AccountResponse::from),
            destination_account: destination_account.map(AccountResponse::from),
        }
    }
}

/// `GET /transactions` payload.
#[derive(Debug, Clone, Serialize)]
pub struct TransactionPage {
    pub transactions: Vec<TransactionResponse>,
    #[serde(flatten)]
    pub meta: PageMeta,
}

impl From<Page<TransactionResponse>> for TransactionPage {
    fn from(page: Page<TransactionResponse>) -> Self {
        let meta = PageMeta::from(&page);
        Self { transactions: page.items, meta }
    }
}
