//! Non-persistent domain models: token claims and the authenticated caller.

pub mod auth;
pub mod token;
