//! # CLI Interface
//!
//! Defines the command-line argument structure for `ixo-cli` using `clap`
//! derive. Supports four subcommands: `generate`, `inspect`, `sign`, and
//! `version`.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Wallet and offline-signing tool for the ixo client SDK.
///
/// Generates deterministic wallets from BIP-39 mnemonics, persists them in
/// encrypted form, and signs canonical JSON payloads with either the
/// transaction (secp) or identity (agent) key.
#[derive(Parser, Debug)]
#[command(
    name = "ixo-cli",
    about = "ixo wallet and signing tool",
    version,
    propagate_version = true
)]
pub struct IxoCli {
    /// Log output format: "pretty" or "json".
    #[arg(long, env = "IXO_LOG_FORMAT", default_value = "pretty", global = true)]
    pub log_format: String,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a wallet (fresh entropy or an existing mnemonic) and print
    /// its DID and addresses.
    Generate(GenerateArgs),
    /// Decrypt a stored wallet and print its DID and addresses.
    Inspect(StoreArgs),
    /// Sign a JSON payload file and print the signed envelope.
    Sign(SignArgs),
    /// Print version information and exit.
    Version,
}

/// Arguments for the `generate` subcommand.
#[derive(Parser, Debug)]
pub struct GenerateArgs {
    /// Use this mnemonic phrase instead of generating fresh entropy.
    #[arg(long, env = "IXO_MNEMONIC")]
    pub mnemonic: Option<String>,

    /// Word count for a generated mnemonic.
    #[arg(long, default_value_t = 12)]
    pub words: usize,

    /// DID prefix for the agent identity.
    #[arg(long, default_value = "did:ixo:")]
    pub did_prefix: String,

    /// Persist the wallet (encrypted) to this store directory.
    #[arg(long)]
    pub store: Option<PathBuf>,

    /// Encryption password; required when --store is given.
    #[arg(long, env = "IXO_WALLET_PASSWORD", default_value = "")]
    pub password: String,

    /// Print the mnemonic phrase to stdout. Off by default so shell
    /// history and terminal scrollback don't collect recovery phrases.
    #[arg(long)]
    pub show_mnemonic: bool,
}

/// Arguments naming a wallet store.
#[derive(Parser, Debug)]
pub struct StoreArgs {
    /// Store directory holding the encrypted wallet.
    #[arg(long)]
    pub store: PathBuf,

    /// Decryption password.
    #[arg(long, env = "IXO_WALLET_PASSWORD", default_value = "")]
    pub password: String,
}

/// Arguments for the `sign` subcommand.
#[derive(Parser, Debug)]
pub struct SignArgs {
    /// Store directory holding the encrypted wallet.
    #[arg(long)]
    pub store: PathBuf,

    /// Decryption password.
    #[arg(long, env = "IXO_WALLET_PASSWORD", default_value = "")]
    pub password: String,

    /// Signer role: "secp" or "agent".
    #[arg(long, default_value = "agent")]
    pub role: String,

    /// Path to the JSON payload file to sign.
    pub payload: PathBuf,
}
