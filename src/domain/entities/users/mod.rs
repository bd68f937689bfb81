pub mod user;

pub use user::{Profile, User};
