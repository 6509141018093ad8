//! # Identity
//!
//! The agent-side identity stack:
//!
//! 1. **Identity seed** — SHA-256 of the mnemonic's BIP-39 seed, truncated
//!    to 32 bytes ([`crate::keys::derive_identity_seed`]).
//! 2. **IdentityDocument** — Ed25519 key pair plus the derived DID and
//!    base58 verification key.
//!
//! The DID base identifier is Base58Check over a SHA-256 prefix of the
//! public key — one-way, checksummed, and stable across implementations.

pub mod document;

pub use document::IdentityDocument;
