//! # Hashing Utilities
//!
//! The digest functions used across the SDK. Everything identity- and
//! address-related reduces to SHA-256 (for chain compatibility) plus
//! RIPEMD-160 for the classic `hash160` account-address construction.
//!
//! Invariant worth stating once: every byte sequence fed into these
//! functions on behalf of signing or identifier derivation must already be
//! canonical (see [`crate::signing::canonical`]); the hashes themselves are
//! plain pass-throughs over audited implementations.

use ripemd::Ripemd160;
use sha2::{Digest, Sha256};

/// Compute the SHA-256 hash of the input data.
///
/// Returns a 32-byte digest as a `Vec<u8>` for callers that immediately
/// slice or chain it.
///
/// # Example
///
/// ```
/// use ixo_client::crypto::hash::sha256;
///
/// let digest = sha256(b"ixo");
/// assert_eq!(digest.len(), 32);
/// ```
pub fn sha256(data: &[u8]) -> Vec<u8> {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().to_vec()
}

/// Compute the SHA-256 hash and return a fixed-size array.
///
/// Same digest as [`sha256`], without the heap allocation. Use this where
/// the array type propagates naturally (seeds, truncated identifiers).
pub fn sha256_array(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    let result = hasher.finalize();
    let mut output = [0u8; 32];
    output.copy_from_slice(&result);
    output
}

/// Compute RIPEMD160(SHA256(data)) — the `hash160` construction used for
/// account addresses derived from secp256k1 public keys.
pub fn hash160(data: &[u8]) -> [u8; 20] {
    let sha = sha256_array(data);
    let mut hasher = Ripemd160::new();
    hasher.update(sha);
    let result = hasher.finalize();
    let mut output = [0u8; 20];
    output.copy_from_slice(&result);
    output
}
