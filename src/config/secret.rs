//! Secret handling for passphrases and credentials
//!
//! The QR passphrase, the storage bearer token and the PostgreSQL connection string
//! are wrapped in `secrecy::Secret`, which zeroes memory on drop and redacts the value
//! from `Debug` output. Callers must go through `expose_secret()` to read them.
//!
//! # Example
//!
//! ```rust
//! use qrbatch::config::secret_string;
//! use secrecy::ExposeSecret;
//!
//! let passphrase = secret_string("correct horse battery".to_string());
//! assert_eq!(passphrase.expose_secret().char_len(), 21);
//! assert!(!format!("{passphrase:?}").contains("horse"));
//! ```

use secrecy::{CloneableSecret, DebugSecret, Secret, SerializableSecret};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use zeroize::Zeroize;

/// String payload of a [`SecretString`]
#[derive(Clone, Debug, Zeroize)]
#[zeroize(drop)]
pub struct SecretValue(String);

impl CloneableSecret for SecretValue {}
impl DebugSecret for SecretValue {}
impl SerializableSecret for SecretValue {}

impl From<String> for SecretValue {
    fn from(s: String) -> Self {
        SecretValue(s)
    }
}

impl PartialEq<str> for SecretValue {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl AsRef<str> for SecretValue {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl SecretValue {
    /// Borrow the secret as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Check if the secret value is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Length in characters (not bytes)
    pub fn char_len(&self) -> usize {
        self.0.chars().count()
    }

    /// Copy with surrounding whitespace removed
    pub fn trimmed(&self) -> SecretValue {
        SecretValue(self.0.trim().to_string())
    }
}

impl Serialize for SecretValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for SecretValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        String::deserialize(deserializer).map(SecretValue)
    }
}

/// Zeroizing, debug-redacted string secret
pub type SecretString = Secret<SecretValue>;

/// Wrap a plain string into a [`SecretString`]
#[inline]
pub fn secret_string(value: String) -> SecretString {
    Secret::new(SecretValue::from(value))
}

/// Wrap an optional plain string into an optional [`SecretString`]
#[inline]
pub fn secret_string_opt(value: Option<String>) -> Option<SecretString> {
    value.map(secret_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_secret_string_creation() {
        let secret = secret_string("test-passphrase".to_string());
        assert_eq!(secret.expose_secret().as_str(), "test-passphrase");
    }

    #[test]
    fn test_secret_string_opt() {
        assert!(secret_string_opt(Some("x".to_string())).is_some());
        assert!(secret_string_opt(None).is_none());
    }

    #[test]
    fn test_char_len_counts_characters() {
        let secret = secret_string("ñandú".to_string());
        assert_eq!(secret.expose_secret().char_len(), 5);
    }

    #[test]
    fn test_trimmed() {
        let secret = secret_string("  spaced out  ".to_string());
        assert_eq!(secret.expose_secret().trimmed().as_str(), "spaced out");
    }

    #[test]
    fn test_secret_debug_redacted() {
        let secret = secret_string("sensitive-data".to_string());
        let debug_output = format!("{secret:?}");
        assert!(!debug_output.contains("sensitive-data"));
    }

    #[test]
    fn test_secret_serde() {
        #[derive(Serialize, Deserialize)]
        struct Holder {
            passphrase: SecretString,
        }

        let holder = Holder {
            passphrase: secret_string("test123".to_string()),
        };

        let json = serde_json::to_string(&holder).unwrap();
        assert!(json.contains("test123"));

        let back: Holder = serde_json::from_str(&json).unwrap();
        assert_eq!(back.passphrase.expose_secret().as_str(), "test123");
    }
}
