use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::dto::common::{to_utc, Page, PageMeta};
use crate::domain::entities::accounts::account::BankAccount;
use crate::domain::money::from_minor_units;

/// Bank account as returned to clients; `balance` is a JSON number.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountResponse {
    pub id: String,
    pub user_id: String,
    pub bank_name: String,
    pub bank_account_number: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub balance: Decimal,
    pub created_at: DateTime<Utc>,
}

impl From<BankAccount> for AccountResponse {
    fn from(account: BankAccount) -> Self {
        Self {
            id: account.id.to_hex(),
            user_id: account.user_id.to_hex(),
            bank_name: account.bank_name,
            bank_account_number: account.bank_account_number,
            balance: from_minor_units(account.balance),
            created_at: to_utc(account.created_at),
        }
    }
}

/// `GET /accounts` payload.
#[derive(Debug, Clone, Serialize)]
pub struct AccountPage {
    pub accounts: Vec<AccountResponse>,
    #[serde(flatten)]
    pub meta: PageMeta,
}

impl From<Page<BankAccount>> for AccountPage {
    fn from(page: Page<BankAccount>) -> Self {
        let meta = PageMeta::from(&page);
        Self {
            accounts: page.items.into_iter().map(AccountResponse::from).collect(),
            meta,
        }
    }
}
