//! Immutable ledger records. Each references its account(s) by id.

pub mod deposit;
pub mod withdrawal;
pub mod transaction;

pub use deposit::Deposit;
pub use withdrawal::Withdrawal;
pub use transaction::Transaction;
