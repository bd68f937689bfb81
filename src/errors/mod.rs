//! Error types and HTTP error rendering.

pub mod errors;

pub use errors::*;
