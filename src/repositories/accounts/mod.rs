//! MongoDB storage for bank accounts (`accounts` collection).

pub mod account_repo;
