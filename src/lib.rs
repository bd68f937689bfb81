//! Bank service backend
//!
//! REST API for a small bank: users with encrypted identity profiles, bank
//! accounts, deposits, withdrawals and transfers between accounts.
//!
//! # Features
//!
//! - **Users**: registration with bcrypt passwords; the profile's identity
//!   number is stored AES-256-CBC encrypted
//! - **Accounts**: opened for an existing user with an opening balance
//! - **Ledger**: deposits, withdrawals and transfers, each applied
//!   atomically and never overdrawing an account
//! - **JWT**: login issues a bearer token; deposit and withdrawal routes
//!   require it
//! - **Storage**: MongoDB, or an in-process store for development
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │   HTTP Routes   │ ← /api/v1 scopes, auth middleware
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │    Handlers     │ ← body shape checks, response envelope
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │    Services     │ ← hashing, encryption, ownership, money rules
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │  Repositories   │ ← MongoDB transactions / in-memory store
//! └─────────────────┘
//! ```
//!
//! # Examples
//!
//! ```rust,ignore
//! use bank_service_backend::repositories::Repositories;
//! use bank_service_backend::services::AppServices;
//!
//! let services = AppServices::new(Repositories::in_memory(), cipher, tokens, 10);
//! let user = services.users.create_user(request).await?;
//! ```

pub mod config;
pub mod db;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod middlewares;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod utils;
