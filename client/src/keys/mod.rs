//! # Key Derivation
//!
//! Everything that turns a mnemonic phrase into usable key material:
//!
//! 1. **Mnemonic** — BIP-39 phrase generation, validation, and the 64-byte
//!    seed, plus the hashed 32-byte identity seed.
//! 2. **SecpKeypair** — the hierarchical-deterministic secp256k1 transaction
//!    key and its bech32 account address.
//!
//! The identity (agent) key pair lives in [`crate::identity`] — it shares
//! the mnemonic but nothing else with the transaction key.

pub mod mnemonic;
pub mod secp;

pub use mnemonic::{
    derive_identity_seed, generate_mnemonic, join_words, mnemonic_to_seed, parse_mnemonic,
    MnemonicError,
};
pub use secp::{KeyError, SecpKeypair};
