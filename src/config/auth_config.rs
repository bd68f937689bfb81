//! # Authentication and encryption configuration
//!
//! Token signing and field-encryption settings, read from the environment.
//!
//! ```bash
//! export JWT_SECRET="your-super-secret-jwt-key"
//! export JWT_EXPIRATION_HOURS="24"
//! export ENCRYPTION_KEY="0123456789abcdef0123456789abcdef"   # exactly 32 bytes
//! ```

use std::env;

pub struct JwtConfig;

impl JwtConfig {
    pub fn secret() -> String {
        env::var("JWT_SECRET")
            .unwrap_or_else(|_| {
                log::warn!("JWT_SECRET not set, using default (not secure for production!)");
                "your-secret-key".to_string()
            })
    }

    /// Access token lifetime. Defaults to 24 hours.
    pub fn expiration_hours() -> i64 {
        env::var("JWT_EXPIRATION_HOURS")
            .unwrap_or_else(|_| "24".to_string())
            .parse()
            .unwrap_or(24)
    }
}

pub struct EncryptionConfig;

impl EncryptionConfig {
    /// Raw `ENCRYPTION_KEY` value, if set. Its length is checked when the
    /// cipher is built so a bad key stops startup.
    pub fn key() -> Option<String> {
        env::var("ENCRYPTION_KEY").ok()
    }
}
