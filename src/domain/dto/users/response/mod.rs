//! User response DTOs.

pub mod user_response;

pub use user_response::{LoginResponse, ProfileResponse, UserPage, UserResponse};
