//! Token format properties, checked by decrypting with the primitives directly

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use pbkdf2::pbkdf2_hmac;
use qrbatch::config::secret_string;
use qrbatch::core::crypto::{TokenCipher, IV_LENGTH, PBKDF2_ITERATIONS, SALT_LENGTH};
use sha2::Sha256;
use std::collections::HashSet;

const PASSPHRASE: &str = "  token-format-passphrase  ";

fn open(passphrase: &str, token: &str) -> Option<String> {
    let parts: Vec<&str> = token.split('.').collect();
    let [version, iv, salt, sealed] = parts.as_slice() else {
        return None;
    };
    if *version != "v1" {
        return None;
    }
    let iv = URL_SAFE_NO_PAD.decode(iv).ok()?;
    let salt = URL_SAFE_NO_PAD.decode(salt).ok()?;
    let sealed = URL_SAFE_NO_PAD.decode(sealed).ok()?;

    let mut key = [0u8; 32];
    pbkdf2_hmac::<Sha256>(passphrase.trim().as_bytes(), &salt, PBKDF2_ITERATIONS, &mut key);
    let cipher = Aes256Gcm::new_from_slice(&key).ok()?;
    let plain = cipher.decrypt(Nonce::from_slice(&iv), sealed.as_ref()).ok()?;
    String::from_utf8(plain).ok()
}

#[test]
fn test_token_shape_and_roundtrip() {
    let cipher = TokenCipher::new(&secret_string(PASSPHRASE.to_string())).unwrap();
    let plaintext = r#"{"codigo":"A1","nombres":"José Núñez"}"#;
    let token = cipher.encrypt(plaintext).unwrap();

    assert!(token
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')));

    let parts: Vec<&str> = token.split('.').collect();
    assert_eq!(parts.len(), 4);
    assert_eq!(URL_SAFE_NO_PAD.decode(parts[1]).unwrap().len(), IV_LENGTH);
    assert_eq!(URL_SAFE_NO_PAD.decode(parts[2]).unwrap().len(), SALT_LENGTH);
    // ciphertext is plaintext length plus the 16 byte tag
    assert_eq!(
        URL_SAFE_NO_PAD.decode(parts[3]).unwrap().len(),
        plaintext.len() + 16
    );

    assert_eq!(open(PASSPHRASE, &token).as_deref(), Some(plaintext));
}

#[test]
fn test_fresh_salt_and_iv_per_token() {
    let cipher = TokenCipher::new(&secret_string(PASSPHRASE.to_string())).unwrap();
    let tokens: Vec<String> = (0..8).map(|_| cipher.encrypt("same").unwrap()).collect();

    let ivs: HashSet<&str> = tokens.iter().map(|t| t.split('.').nth(1).unwrap()).collect();
    let salts: HashSet<&str> = tokens.iter().map(|t| t.split('.').nth(2).unwrap()).collect();
    assert_eq!(ivs.len(), tokens.len());
    assert_eq!(salts.len(), tokens.len());
}

#[test]
fn test_wrong_passphrase_or_tampering_fails() {
    let cipher = TokenCipher::new(&secret_string(PASSPHRASE.to_string())).unwrap();
    let token = cipher.encrypt("codigo=A1").unwrap();

    assert!(open("another-passphrase-here", &token).is_none());

    let mut parts: Vec<String> = token.split('.').map(str::to_string).collect();
    let mut sealed = URL_SAFE_NO_PAD.decode(&parts[3]).unwrap();
    sealed[0] ^= 0x01;
    parts[3] = URL_SAFE_NO_PAD.encode(sealed);
    assert!(open(PASSPHRASE, &parts.join(".")).is_none());
}

#[test]
fn test_empty_plaintext_is_sealed() {
    let cipher = TokenCipher::new(&secret_string(PASSPHRASE.to_string())).unwrap();
    let token = cipher.encrypt("").unwrap();
    assert_eq!(open(PASSPHRASE, &token).as_deref(), Some(""));
}

#[test]
fn test_short_passphrase_rejected() {
    assert!(TokenCipher::new(&secret_string("   short    ".to_string())).is_err());
}
