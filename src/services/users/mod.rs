//! User registration, lookup and password verification.

pub mod user_service;

pub use user_service::UserService;
