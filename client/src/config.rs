//! # SDK Configuration & Constants
//!
//! Every protocol constant the SDK depends on lives here: network endpoints,
//! address prefixes, key-derivation parameters, and the wire-format literals
//! that remote verifiers match byte-for-byte.
//!
//! Several of these values are contractual. The `pub_key.type` strings and
//! the bech32/DID prefixes are checked by the chain and by cell nodes, so
//! changing them breaks signature verification on the remote side, not just
//! locally.

// ---------------------------------------------------------------------------
// Default Endpoints
// ---------------------------------------------------------------------------

/// Default blockchain REST endpoint (testnet).
pub const DEFAULT_BLOCKCHAIN_URL: &str = "https://testnet.ixo.earth/rest";

/// Default blocksync (indexer) endpoint.
pub const DEFAULT_BLOCKSYNC_URL: &str = "https://blocksync-pandora.ixo.earth";

/// Default cell node endpoint, used when a project record carries no
/// CellNode service entry of its own.
pub const DEFAULT_CELLNODE_URL: &str = "https://cellnode-pandora.ixo.earth";

/// Default block-scan (transaction history) endpoint.
pub const DEFAULT_BLOCKSCAN_URL: &str = "https://blockscan-pandora.ixo.earth";

/// Cell node path for authenticated (signed) RPC calls.
pub const CELLNODE_REQUEST_PATH: &str = "/api/request";

/// Cell node path for public (unsigned) RPC calls.
pub const CELLNODE_PUBLIC_PATH: &str = "/api/public";

// ---------------------------------------------------------------------------
// Chain Identifiers
// ---------------------------------------------------------------------------

/// Bech32 human-readable prefix for account addresses.
pub const ADDRESS_HRP: &str = "ixo";

/// Prefix for decentralized identifiers issued by this SDK.
pub const DID_PREFIX: &str = "did:ixo:";

/// Native staking/fee denomination (micro-units).
pub const NATIVE_DENOM: &str = "uixo";

/// BIP-44 coin type for the transaction key pair (the Cosmos registry value).
pub const COIN_TYPE: u32 = 118;

/// Full derivation path for the transaction signing key.
pub const HD_PATH: &str = "m/44'/118'/0'/0/0";

// ---------------------------------------------------------------------------
// Signature Wire Literals
// ---------------------------------------------------------------------------

/// `pub_key.type` tag for Ed25519 signatures. Matched bit-exact by
/// downstream verifiers.
pub const ED25519_PUBKEY_TYPE: &str = "tendermint/PubKeyEd25519";

/// `pub_key.type` tag for secp256k1 signatures.
pub const SECP256K1_PUBKEY_TYPE: &str = "tendermint/PubKeySecp256k1";

/// Algorithm label carried in cell-node signature blocks for the agent key.
pub const AGENT_SIGN_ALGO: &str = "ed25519-sha-256";

/// Ed25519 / secp256k1 compact signature length in bytes.
pub const SIGNATURE_LENGTH: usize = 64;

// ---------------------------------------------------------------------------
// Identity Derivation
// ---------------------------------------------------------------------------

/// Number of SHA-256 digest bytes folded into the DID base identifier.
pub const DID_ID_HASH_BYTES: usize = 16;

/// Number of SHA-256 digest bytes folded into the agent account address.
pub const AGENT_ADDRESS_HASH_BYTES: usize = 20;

// ---------------------------------------------------------------------------
// Wallet Serialization
// ---------------------------------------------------------------------------

/// Format tag carried in the serialized wallet container. Bumped on any
/// incompatible change to the ciphertext layout or KDF parameters.
pub const WALLET_FORMAT: &str = "ixo-wallet/v1";

/// PBKDF2-HMAC-SHA256 iteration count for the wallet encryption key.
/// High enough to make offline guessing expensive on current hardware;
/// deserialization reads the count from the container, so this value can
/// be raised without breaking existing wallets.
pub const PBKDF2_ITERATIONS: u32 = 600_000;

/// Length of the random PBKDF2 salt in bytes.
pub const KDF_SALT_LENGTH: usize = 16;

/// AES-256-GCM key length in bytes.
pub const AES_KEY_LENGTH: usize = 32;

/// AES-256-GCM nonce length in bytes. 96 bits, the standard GCM nonce size.
pub const AES_NONCE_LENGTH: usize = 12;

/// Fixed key under which the serialized wallet is persisted in a
/// [`WalletStore`](crate::wallet::WalletStore).
pub const WALLET_STORAGE_KEY: &str = "wallet";

/// Default word count for generated mnemonics.
pub const DEFAULT_MNEMONIC_WORDS: usize = 12;

// ---------------------------------------------------------------------------
// Transaction Defaults
// ---------------------------------------------------------------------------

/// Default fee amount in [`NATIVE_DENOM`] attached to broadcasts when the
/// caller does not supply one.
pub const DEFAULT_FEE_AMOUNT: u64 = 5_000;

/// Default gas limit attached to broadcasts.
pub const DEFAULT_GAS: &str = "200000";

/// Broadcast mode sent with every transaction.
pub const BROADCAST_MODE: &str = "sync";

// ---------------------------------------------------------------------------
// RPC Envelope
// ---------------------------------------------------------------------------

/// Inclusive upper bound for generated JSON-RPC request ids. Ids are a
/// request-correlation hint, not a uniqueness guarantee.
pub const RPC_ID_MAX: u64 = 1_000_000;

/// JSON-RPC protocol version string.
pub const JSONRPC_VERSION: &str = "2.0";

/// JSON-LD context attached to submitted claims.
pub const CLAIM_SCHEMA_CONTEXT: &str =
    "https://schema.ixo.foundation/claims/53690e7d550278dbe228ddf35e0ba72b2666cba6";
