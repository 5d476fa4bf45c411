//! QR token encryption
//!
//! Token layout, every segment base64url without padding:
//!
//! ```text
//! v1.<iv>.<salt>.<ciphertext || tag>
//! ```
//!
//! - `iv`: 12 random bytes (AES-GCM nonce)
//! - `salt`: 16 random bytes
//! - key: PBKDF2-HMAC-SHA256(passphrase, salt, 100 000 iterations), 32 bytes
//! - ciphertext: AES-256-GCM with the 16-byte tag appended
//!
//! There is no decryption path in this crate; the version prefix leaves room for
//! readers elsewhere.

use crate::config::schema::MIN_PASSPHRASE_CHARS;
use crate::config::SecretString;
use crate::domain::{QrBatchError, Result};
use aes_gcm::aead::rand_core::RngCore;
use aes_gcm::aead::{Aead, KeyInit, OsRng};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use pbkdf2::pbkdf2_hmac;
use secrecy::{ExposeSecret, Secret};
use sha2::Sha256;
use zeroize::Zeroizing;

/// Token format version
pub const TOKEN_VERSION: &str = "v1";
pub const PBKDF2_ITERATIONS: u32 = 100_000;
pub const KEY_LENGTH: usize = 32;
pub const SALT_LENGTH: usize = 16;
pub const IV_LENGTH: usize = 12;

/// Passphrase-keyed token encrypter
///
/// The passphrase is checked once here; `encrypt` never re-validates it.
#[derive(Clone)]
pub struct TokenCipher {
    passphrase: SecretString,
}

impl std::fmt::Debug for TokenCipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCipher").finish_non_exhaustive()
    }
}

impl TokenCipher {
    /// # Errors
    ///
    /// [`QrBatchError::Configuration`] when the trimmed passphrase has fewer than
    /// 12 characters.
    pub fn new(passphrase: &SecretString) -> Result<Self> {
        let trimmed = passphrase.expose_secret().trimmed();
        if trimmed.char_len() < MIN_PASSPHRASE_CHARS {
            return Err(QrBatchError::Configuration(format!(
                "qr.secret_key is missing or too short (>= {MIN_PASSPHRASE_CHARS} chars)"
            )));
        }
        Ok(Self {
            passphrase: Secret::new(trimmed),
        })
    }

    /// Encrypts `plaintext` into a fresh token
    ///
    /// Salt and iv are drawn per call, so equal inputs give different tokens.
    /// Key derivation is CPU bound; async callers should run this on a blocking
    /// thread.
    pub fn encrypt(&self, plaintext: &str) -> Result<String> {
        let mut salt = [0u8; SALT_LENGTH];
        let mut iv = [0u8; IV_LENGTH];
        OsRng.fill_bytes(&mut salt);
        OsRng.fill_bytes(&mut iv);

        let key = self.derive_key(&salt);
        let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key.as_slice()));
        let sealed = cipher
            .encrypt(Nonce::from_slice(&iv), plaintext.as_bytes())
            .map_err(|e| QrBatchError::Encryption(format!("AES-GCM encryption failed: {e}")))?;

        Ok(format!(
            "{TOKEN_VERSION}.{}.{}.{}",
            URL_SAFE_NO_PAD.encode(iv),
            URL_SAFE_NO_PAD.encode(salt),
            URL_SAFE_NO_PAD.encode(sealed)
        ))
    }

    fn derive_key(&self, salt: &[u8]) -> Zeroizing<[u8; KEY_LENGTH]> {
        let mut key = Zeroizing::new([0u8; KEY_LENGTH]);
        pbkdf2_hmac::<Sha256>(
            self.passphrase.expose_secret().as_str().as_bytes(),
            salt,
            PBKDF2_ITERATIONS,
            key.as_mut_slice(),
        );
        key
    }
}
