//! MongoDB storage for users (`users` collection).

pub mod user_repo;
