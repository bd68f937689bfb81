//! Deposit, withdrawal and transfer DTOs.

pub mod request;
pub mod response;

pub use request::{DepositRequest, TransferRequest, WithdrawalRequest};
pub use response::{DepositResponse, TransactionPage, TransactionResponse, WithdrawalResponse};
