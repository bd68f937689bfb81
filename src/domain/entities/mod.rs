//! Persistent entities as stored by the repositories.
//!
//! Entities use storage types directly (`ObjectId`, BSON `DateTime`, integer
//! minor units). Conversion to client-facing shapes happens in the DTO
//! layer.

pub mod users;
pub mod accounts;
pub mod ledger;

pub use users::*;
pub use accounts::*;
pub use ledger::*;
