//! Balance-changing operations and their records.

pub mod ledger_service;

pub use ledger_service::LedgerService;
