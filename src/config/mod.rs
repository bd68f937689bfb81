//! Configuration read from environment variables.
//!
//! Values are loaded from `.env.dev`, `.env.prod` or `.env` at startup
//! (see `main.rs`) and read on demand through the static config structs.

pub mod data_config;
pub mod auth_config;

pub use data_config::*;
pub use auth_config::*;
