//! # Field encryption
//!
//! Reversible encryption of a single sensitive field (the profile identity
//! number) at rest.
//!
//! - AES-256 in CBC mode with PKCS#7 padding
//! - a fresh random 16-byte IV per call, so equal plaintexts never produce
//!   equal ciphertexts
//! - wire format `hex(iv) + ":" + hex(ciphertext)`
//!
//! CBC carries no integrity check: a tampered value either fails padding
//! removal or decrypts to garbage that is rejected if it is not UTF-8. The
//! format is kept as is so previously stored values stay readable.

use aes::Aes256;
use cbc::cipher::block_padding::Pkcs7;
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use thiserror::Error;

use crate::config::EncryptionConfig;
use crate::errors::AppError;

type Aes256CbcEnc = cbc::Encryptor<Aes256>;
type Aes256CbcDec = cbc::Decryptor<Aes256>;

pub const KEY_LENGTH: usize = 32;
pub const IV_LENGTH: usize = 16;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CryptoError {
    #[error("ENCRYPTION_KEY must be set and {KEY_LENGTH} characters long")]
    MissingKey,

    #[error("encryption key must be {KEY_LENGTH} bytes, got {0}")]
    InvalidKeyLength(usize),

    #[error("malformed ciphertext: {0}")]
    MalformedCiphertext(String),

    #[error("decryption failed")]
    Decrypt,
}

impl From<CryptoError> for AppError {
    fn from(err: CryptoError) -> Self {
        AppError::CryptoError(err.to_string())
    }
}

/// AES-256-CBC cipher bound to one 32-byte key.
#[derive(Clone)]
pub struct FieldCipher {
    key: [u8; KEY_LENGTH],
}

impl std::fmt::Debug for FieldCipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldCipher").finish_non_exhaustive()
    }
}

impl FieldCipher {
    /// Builds a cipher from raw key bytes; the key must be exactly 32 bytes.
    pub fn new(key: &[u8]) -> Result<Self, CryptoError> {
        let key: [u8; KEY_LENGTH] = key
            .try_into()
            .map_err(|_| CryptoError::InvalidKeyLength(key.len()))?;
        Ok(Self { key })
    }

    /// Builds a cipher from `ENCRYPTION_KEY`, whose bytes are used as the key.
    pub fn from_env() -> Result<Self, CryptoError> {
        let key = EncryptionConfig::key().ok_or(CryptoError::MissingKey)?;
        Self::new(key.as_bytes())
    }

    /// Encrypts `plaintext` under a fresh random IV.
    pub fn encrypt(&self, plaintext: &str) -> String {
        let iv: [u8; IV_LENGTH] = rand::random();
        let ciphertext = Aes256CbcEnc::new(&self.key.into(), &iv.into())
            .encrypt_padded_vec_mut::<Pkcs7>(plaintext.as_bytes());

        format!("{}:{}", hex::encode(iv), hex::encode(ciphertext))
    }

    /// Reverses [`encrypt`](Self::encrypt).
    pub fn decrypt(&self, encoded: &str) -> Result<String, CryptoError> {
        let (iv_hex, ciphertext_hex) = encoded
            .split_once(':')
            .ok_or_else(|| CryptoError::MalformedCiphertext("missing ':' separator".to_string()))?;

        let iv: [u8; IV_LENGTH] = hex::decode(iv_hex)
            .map_err(|e| CryptoError::MalformedCiphertext(format!("iv: {}", e)))?
            .try_into()
            .map_err(|_| CryptoError::MalformedCiphertext(format!("iv must be {} bytes", IV_LENGTH)))?;
        let ciphertext = hex::decode(ciphertext_hex)
            .map_err(|e| CryptoError::MalformedCiphertext(format!("ciphertext: {}", e)))?;

        let plaintext = Aes256CbcDec::new(&self.key.into(), &iv.into())
            .decrypt_padded_vec_mut::<Pkcs7>(&ciphertext)
            .map_err(|_| CryptoError::Decrypt)?;

        String::from_utf8(plaintext).map_err(|_| CryptoError::Decrypt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &[u8; 32] = b"0123456789abcdef0123456789abcdef";

    fn cipher() -> FieldCipher {
        FieldCipher::new(KEY).unwrap()
    }

    #[test]
    fn test_roundtrip() {
        let cipher = cipher();
        for plaintext in ["1234567890123456", "", "ünïcödé ✓", &"x".repeat(100)] {
            let encoded = cipher.encrypt(plaintext);
            assert_eq!(cipher.decrypt(&encoded).unwrap(), plaintext);
        }
    }

    #[test]
    fn test_same_plaintext_encrypts_differently() {
        let cipher = cipher();
        let first = cipher.encrypt("1234567890123456");
        let second = cipher.encrypt("1234567890123456");

        assert_ne!(first, second);
        assert_ne!(first, "1234567890123456");
    }

    #[test]
    fn test_wire_format() {
        let encoded = cipher().encrypt("1234567890123456");
        let (iv, ciphertext) = encoded.split_once(':').unwrap();

        assert_eq!(iv.len(), IV_LENGTH * 2);
        // 16 bytes of input plus a full padding block
        assert_eq!(ciphertext.len(), 32 * 2);
        assert!(encoded.chars().all(|c| c == ':' || c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_key_length_enforced() {
        assert_eq!(FieldCipher::new(b"short").unwrap_err(), CryptoError::InvalidKeyLength(5));
        assert!(FieldCipher::new(&[0u8; 33]).is_err());
    }

    #[test]
    fn test_malformed_inputs_fail() {
        let cipher = cipher();
        assert!(matches!(cipher.decrypt("no-separator"), Err(CryptoError::MalformedCiphertext(_))));
        assert!(matches!(cipher.decrypt("zz:00"), Err(CryptoError::MalformedCiphertext(_))));
        assert!(matches!(cipher.decrypt("00ff:00"), Err(CryptoError::MalformedCiphertext(_))));
    }

    #[test]
    fn test_wrong_key_fails() {
        let encoded = cipher().encrypt("1234567890123456");
        let other = FieldCipher::new(b"fedcba9876543210fedcba9876543210").unwrap();

        // Without a MAC a wrong key is only caught when padding or UTF-8
        // checks fail; it must never yield the original plaintext.
        match other.decrypt(&encoded) {
            Ok(plaintext) => assert_ne!(plaintext, "1234567890123456"),
            Err(err) => assert_eq!(err, CryptoError::Decrypt),
        }
    }

    #[test]
    fn test_tampered_ciphertext_fails() {
        let cipher = cipher();
        let encoded = cipher.encrypt("1234567890123456");
        let (iv, ciphertext) = encoded.split_once(':').unwrap();
        // Truncating to a non-block-multiple length can never decrypt.
        let tampered = format!("{}:{}", iv, &ciphertext[..ciphertext.len() - 2]);

        assert_eq!(cipher.decrypt(&tampered), Err(CryptoError::Decrypt));
    }
}
