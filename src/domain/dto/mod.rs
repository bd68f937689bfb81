//! # Data Transfer Objects
//!
//! Shapes exchanged with HTTP clients. Request DTOs carry their endpoint's
//! [`BodySchema`](crate::utils::request_body::BodySchema) and per-entity
//! `validator` rules; response DTOs convert stored entities into the JSON
//! clients see (camelCase keys, decimal amounts, RFC 3339 timestamps).
//!
//! ```text
//! dto/
//! ├── common/     # envelope, pagination, timestamps
//! ├── users/      # user + login requests/responses
//! ├── accounts/   # bank account requests/responses
//! └── ledger/     # deposit, withdrawal, transfer
//! ```

pub mod common;
pub mod users;
pub mod accounts;
pub mod ledger;
