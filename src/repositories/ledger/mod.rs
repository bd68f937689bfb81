//! MongoDB storage for deposits, withdrawals and transactions, and the
//! balance updates that go with them.

pub mod ledger_repo;
