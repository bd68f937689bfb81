//! Bank account DTOs.

pub mod request;
pub mod response;

pub use request::CreateAccountRequest;
pub use response::{AccountPage, AccountResponse};
