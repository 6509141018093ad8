//! # Password-Based Authenticated Encryption
//!
//! Encryption for the serialized wallet form: PBKDF2-HMAC-SHA256 stretches
//! the caller's password into an AES-256-GCM key, and the cipher seals the
//! wallet plaintext with a random 96-bit nonce.
//!
//! ## Wire format
//!
//! [`seal`] returns `nonce || ciphertext` as a single buffer. The first 12
//! bytes are the nonce; the rest is ciphertext plus the 16-byte GCM tag.
//! [`open`] expects the same layout. KDF parameters (salt, iteration count)
//! travel in the serialized wallet container, not here — this module only
//! sees the already-chosen parameters.
//!
//! ## Nonce management
//!
//! Nonces are drawn fresh from the OS CSPRNG for every seal. A wallet is
//! re-encrypted at most a handful of times over its life, so the 96-bit
//! birthday bound is never approached.

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Nonce,
};
use hmac::Hmac;
use rand::RngCore;
use sha2::Sha256;
use thiserror::Error;

use crate::config::{AES_KEY_LENGTH, AES_NONCE_LENGTH};

/// Errors from the wallet encryption layer.
///
/// Decryption failures are deliberately indistinct: "wrong password" and
/// "tampered ciphertext" produce the same error.
#[derive(Debug, Error)]
pub enum EncryptionError {
    #[error("encryption failed")]
    EncryptFailed,

    #[error("decryption failed -- wrong password or corrupted data")]
    DecryptFailed,

    #[error("key derivation failed")]
    KeyDerivation,

    #[error("ciphertext too short: must be at least {AES_NONCE_LENGTH} bytes")]
    CiphertextTooShort,
}

/// Stretch a password into a 32-byte AES key with PBKDF2-HMAC-SHA256.
///
/// The salt and iteration count are supplied by the caller so that the
/// serialized wallet container can record them and older wallets remain
/// decryptable after the defaults change.
pub fn derive_key(
    password: &str,
    salt: &[u8],
    iterations: u32,
) -> Result<[u8; AES_KEY_LENGTH], EncryptionError> {
    let mut key = [0u8; AES_KEY_LENGTH];
    pbkdf2::pbkdf2::<Hmac<Sha256>>(password.as_bytes(), salt, iterations, &mut key)
        .map_err(|_| EncryptionError::KeyDerivation)?;
    Ok(key)
}

/// Encrypt plaintext with AES-256-GCM under a random nonce.
///
/// Returns `nonce || ciphertext`.
pub fn seal(key: &[u8; AES_KEY_LENGTH], plaintext: &[u8]) -> Result<Vec<u8>, EncryptionError> {
    let cipher = Aes256Gcm::new_from_slice(key).map_err(|_| EncryptionError::EncryptFailed)?;

    let mut nonce_bytes = [0u8; AES_NONCE_LENGTH];
    rand::rngs::OsRng.fill_bytes(&mut nonce_bytes);
    let nonce = Nonce::from_slice(&nonce_bytes);

    let ciphertext = cipher
        .encrypt(nonce, plaintext)
        .map_err(|_| EncryptionError::EncryptFailed)?;

    let mut out = Vec::with_capacity(AES_NONCE_LENGTH + ciphertext.len());
    out.extend_from_slice(&nonce_bytes);
    out.extend_from_slice(&ciphertext);
    Ok(out)
}

/// Decrypt data previously produced by [`seal`].
pub fn open(key: &[u8; AES_KEY_LENGTH], data: &[u8]) -> Result<Vec<u8>, EncryptionError> {
    if data.len() < AES_NONCE_LENGTH {
        return Err(EncryptionError::CiphertextTooShort);
    }

    let (nonce_bytes, ciphertext) = data.split_at(AES_NONCE_LENGTH);
    let cipher = Aes256Gcm::new_from_slice(key).map_err(|_| EncryptionError::DecryptFailed)?;
    let nonce = Nonce::from_slice(nonce_bytes);

    cipher
        .decrypt(nonce, ciphertext)
        .map_err(|_| EncryptionError::DecryptFailed)
}
