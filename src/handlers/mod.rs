//! HTTP handlers
//!
//! Handlers take the raw JSON body, run it through
//! [`parse_body`](crate::utils::request_body::parse_body), call one service
//! method and wrap the result in the `{ message, data, code, error }`
//! envelope. Scopes and middleware are assigned in [`crate::routes`].

pub mod accounts;
pub mod auth;
pub mod deposits;
pub mod transactions;
pub mod users;
pub mod withdrawals;
