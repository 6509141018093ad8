//! # Cryptographic Primitives
//!
//! Thin, type-safe wrappers over audited implementations — nothing in this
//! module invents cryptography. The SDK's needs are narrow:
//!
//! - **SHA-256 / RIPEMD-160** — identifier and address derivation.
//! - **AES-256-GCM + PBKDF2** — the encrypted serialized wallet form.
//! - **base64** — signature and public-key wire encoding.
//!
//! The signing curves themselves (Ed25519 via `ed25519-dalek`, secp256k1 via
//! `k256`) are used directly by the key and identity modules rather than
//! wrapped here, since each has a single owner.

pub mod encoding;
pub mod encryption;
pub mod hash;

pub use encoding::{from_base64, to_base64};
pub use encryption::{derive_key, open, seal, EncryptionError};
pub use hash::{hash160, sha256, sha256_array};
