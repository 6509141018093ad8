// Copyright (c) 2026 ixo-client contributors. MIT License.
// See LICENSE for details.

//! # ixo-cli
//!
//! Entry point for the `ixo-cli` binary: deterministic wallet generation,
//! encrypted persistence, and offline signing of canonical JSON payloads.
//!
//! The binary supports four subcommands:
//!
//! - `generate` — derive a wallet and print its DID and addresses
//! - `inspect`  — decrypt a stored wallet and print its identity
//! - `sign`     — sign a JSON payload file with the secp or agent key
//! - `version`  — print build version information

mod cli;
mod logging;

use anyhow::{Context, Result};
use clap::Parser;

use ixo_client::wallet::{SignerRole, SledStore, Wallet, WalletSource};

use cli::{Commands, GenerateArgs, IxoCli, SignArgs, StoreArgs};
use logging::LogFormat;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = IxoCli::parse();
    logging::init_logging("ixo_cli=info,ixo_client=info", LogFormat::from_str_lossy(&cli.log_format));

    match cli.command {
        Commands::Generate(args) => generate(args).await,
        Commands::Inspect(args) => inspect(args).await,
        Commands::Sign(args) => sign(args).await,
        Commands::Version => {
            print_version();
            Ok(())
        }
    }
}

/// Derive a wallet, optionally persist it, and print its public identity.
async fn generate(args: GenerateArgs) -> Result<()> {
    let source = match args.mnemonic {
        Some(phrase) => WalletSource::Mnemonic(phrase),
        None if args.words == 12 => WalletSource::Generate,
        None => WalletSource::Words(
            ixo_client::keys::generate_mnemonic(args.words).context("generating mnemonic")?,
        ),
    };

    let wallet = Wallet::from_source(source, &args.did_prefix, &args.password)
        .context("building wallet")?;

    if let Some(path) = args.store {
        let store = SledStore::open(&path)
            .with_context(|| format!("opening wallet store at {}", path.display()))?;
        wallet
            .persist(&store, &args.password)
            .await
            .context("persisting wallet")?;
        tracing::info!(path = %path.display(), "wallet persisted");
    }

    print_identity(&wallet);
    if args.show_mnemonic {
        println!("mnemonic:      {}", wallet.mnemonic());
    }
    Ok(())
}

/// Decrypt a stored wallet and print its public identity.
async fn inspect(args: StoreArgs) -> Result<()> {
    let wallet = load_wallet(&args).await?;
    print_identity(&wallet);
    Ok(())
}

/// Sign a JSON payload file and print the signed envelope to stdout.
async fn sign(args: SignArgs) -> Result<()> {
    let role: SignerRole = args.role.parse().context("parsing signer role")?;

    let wallet = load_wallet(&StoreArgs {
        store: args.store,
        password: args.password,
    })
    .await?;

    let raw = std::fs::read_to_string(&args.payload)
        .with_context(|| format!("reading payload from {}", args.payload.display()))?;
    let payload: serde_json::Value =
        serde_json::from_str(&raw).context("payload is not valid JSON")?;

    let envelope = wallet.sign(role, &payload).context("signing payload")?;
    println!("{}", serde_json::to_string_pretty(&envelope)?);
    Ok(())
}

async fn load_wallet(args: &StoreArgs) -> Result<Wallet> {
    let store = SledStore::open(&args.store)
        .with_context(|| format!("opening wallet store at {}", args.store.display()))?;
    Wallet::load(&store, &args.password)
        .await
        .context("loading wallet from store")
}

fn print_identity(wallet: &Wallet) {
    println!("agent DID:     {}", wallet.did());
    println!("agent address: {}", wallet.agent().address());
    println!("secp address:  {}", wallet.secp_address());
    println!("verify key:    {}", wallet.agent().verify_key());
}

fn print_version() {
    println!("ixo-cli {}", env!("CARGO_PKG_VERSION"));
}
