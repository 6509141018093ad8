//! # Mnemonic Handling
//!
//! BIP-39 phrase generation, validation, and seed extraction. A mnemonic is
//! the single root secret of a wallet: the transaction key pair is derived
//! from its BIP-39 seed through the hierarchical path, and the identity key
//! pair from a hash of the same seed (see [`derive_identity_seed`]).
//!
//! Phrases are validated against the English wordlist and their embedded
//! checksum. A phrase that fails either check is rejected up front with
//! [`MnemonicError::InvalidPhrase`] rather than producing a wallet that can
//! never be recovered elsewhere.

use bip39::{Language, Mnemonic};
use rand::RngCore;
use thiserror::Error;

use crate::crypto::hash::sha256_array;

/// Word counts accepted by BIP-39.
const VALID_WORD_COUNTS: [usize; 5] = [12, 15, 18, 21, 24];

/// Errors from mnemonic parsing and generation.
#[derive(Debug, Error)]
pub enum MnemonicError {
    /// The phrase failed wordlist or checksum validation.
    #[error("invalid mnemonic phrase: {0}")]
    InvalidPhrase(String),

    /// The requested word count is not a valid BIP-39 length.
    #[error("unsupported mnemonic word count: {0} (expected 12, 15, 18, 21 or 24)")]
    UnsupportedWordCount(usize),
}

/// Generate a fresh mnemonic from OS entropy.
///
/// Each group of 3 words encodes 32 bits of entropy, so the default 12-word
/// phrase carries 128 bits.
pub fn generate_mnemonic(word_count: usize) -> Result<Vec<String>, MnemonicError> {
    if !VALID_WORD_COUNTS.contains(&word_count) {
        return Err(MnemonicError::UnsupportedWordCount(word_count));
    }

    let entropy_len = word_count / 3 * 4;
    let mut entropy = vec![0u8; entropy_len];
    rand::rngs::OsRng.fill_bytes(&mut entropy);

    let mnemonic = Mnemonic::from_entropy_in(Language::English, &entropy)
        .map_err(|e| MnemonicError::InvalidPhrase(e.to_string()))?;

    Ok(mnemonic.words().map(str::to_string).collect())
}

/// Parse and validate a mnemonic phrase.
///
/// Whitespace is normalized; words must come from the English wordlist and
/// the checksum must hold.
pub fn parse_mnemonic(phrase: &str) -> Result<Mnemonic, MnemonicError> {
    Mnemonic::parse_in_normalized(Language::English, phrase)
        .map_err(|e| MnemonicError::InvalidPhrase(e.to_string()))
}

/// Join a word array into the canonical single-space phrase form.
pub fn join_words<S: AsRef<str>>(words: &[S]) -> String {
    words
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Extract the 64-byte BIP-39 seed from a validated mnemonic.
///
/// The passphrase slot is intentionally empty — wallet recovery across SDK
/// implementations depends on every party using the same (absent) passphrase.
pub fn mnemonic_to_seed(mnemonic: &Mnemonic) -> [u8; 64] {
    mnemonic.to_seed("")
}

/// Derive the 32-byte identity seed from a mnemonic phrase.
///
/// SHA-256 over the BIP-39 seed bytes, truncated to 32 bytes. This is the
/// deliberate coupling that makes one mnemonic yield two independent key
/// pairs: the transaction key walks the hierarchical path over the raw seed,
/// while the identity key grows from this hash of it. Both are reproducible
/// from the phrase alone; neither is computable from the other.
pub fn derive_identity_seed(phrase: &str) -> Result<[u8; 32], MnemonicError> {
    let mnemonic = parse_mnemonic(phrase)?;
    let seed = mnemonic_to_seed(&mnemonic);
    Ok(sha256_array(&seed))
}
