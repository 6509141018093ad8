//! # Encoding Helpers
//!
//! Thin wrappers over the base64 engine API so call sites stay readable.
//! Base58 and bech32 are used directly where they appear (identity and
//! address derivation) since each has exactly one call site per direction.

use base64::engine::general_purpose::STANDARD;
use base64::{DecodeError, Engine as _};

/// Encode bytes as standard (padded) base64.
pub fn to_base64(data: &[u8]) -> String {
    STANDARD.encode(data)
}

/// Decode a standard base64 string.
pub fn from_base64(data: &str) -> Result<Vec<u8>, DecodeError> {
    STANDARD.decode(data)
}
