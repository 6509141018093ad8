// Copyright (c) 2026 ixo-client contributors. MIT License.
// See LICENSE for details.

//! # ixo-client — Rust SDK for the ixo network
//!
//! A client SDK for an ixo-style blockchain (identity, claims, staking,
//! bonding-curve tokens) and its cell-node document services. The SDK is a
//! deliberately thin binding: the remote protocol is owned by the node and
//! cell-node services; what lives here is the part with real invariants —
//! deterministic wallet derivation and the canonical request-signing
//! pipeline.
//!
//! ## Architecture
//!
//! - **keys** — BIP-39 mnemonics and the hierarchical secp256k1 transaction
//!   key.
//! - **identity** — the Ed25519 agent key pair and its DID document.
//! - **signing** — canonical (sorted-key) JSON serialization and the
//!   verifiable signature envelope.
//! - **wallet** — the aggregate of both key pairs, with encrypted
//!   serialize/deserialize and pluggable persistence.
//! - **rpc** — the public and authenticated cell-node envelope shapes.
//! - **tx** — ledger message, sign-doc, and broadcast shapes.
//! - **client** — the explicit session handle: endpoints, transport,
//!   optional wallet, and the remote-call surface.
//! - **crypto** / **config** — shared primitives and protocol constants.
//!
//! ## Quick start
//!
//! ```no_run
//! use ixo_client::client::Client;
//! use ixo_client::config::DID_PREFIX;
//! use ixo_client::wallet::{Wallet, WalletSource};
//!
//! # async fn run() -> Result<(), ixo_client::Error> {
//! let wallet = Wallet::from_source(WalletSource::Generate, DID_PREFIX, "")?;
//! println!("agent DID: {}", wallet.did());
//!
//! let client = Client::new(Some(wallet))?;
//! let projects = client.list_projects().await?;
//! # let _ = projects;
//! # Ok(())
//! # }
//! ```
//!
//! Every derivation is deterministic: one mnemonic yields the same DID and
//! addresses on every run and every implementation of this protocol.

pub mod client;
pub mod config;
pub mod crypto;
pub mod error;
pub mod identity;
pub mod keys;
pub mod rpc;
pub mod signing;
pub mod tx;
pub mod wallet;

// The types nearly every caller needs, importable from the crate root.
pub use client::{CellnodeTarget, Client, Endpoints};
pub use error::Error;
pub use wallet::{SignerRole, Wallet, WalletSource};
