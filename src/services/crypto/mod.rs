//! Symmetric encryption of sensitive fields.

pub mod field_cipher;

pub use field_cipher::{CryptoError, FieldCipher};
