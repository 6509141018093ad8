//! # Wallet Aggregate
//!
//! A [`Wallet`] composes the two key pairs of a session:
//!
//! - **secp** — the secp256k1 transaction signer (bank, staking, bonds).
//! - **agent** — the Ed25519 identity that signs cell-node requests and
//!   DID-related messages.
//!
//! Both derive from one mnemonic; a wallet is never partially constructed —
//! construction either yields both key pairs or an error. Once built, a
//! wallet is immutable. "The active signer" is not a wallet concern: attach
//! a wallet to a [`Client`](crate::client::Client) to use it, which keeps
//! concurrent sessions independent instead of racing on process state.
//!
//! ## Input sources
//!
//! [`WalletSource`] is an explicit tagged input. The caller states whether
//! it is supplying a mnemonic phrase, a word array, or a previously
//! serialized wallet — there is no parse-sniffing, so a phrase can never be
//! mistaken for a serialized form.

pub mod persist;
pub mod store;

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;
use zeroize::Zeroizing;

use crate::config::{
    ADDRESS_HRP, AGENT_SIGN_ALGO, DEFAULT_MNEMONIC_WORDS, HD_PATH, WALLET_STORAGE_KEY,
};
use crate::crypto::encoding::to_base64;
use crate::crypto::encryption::EncryptionError;
use crate::identity::IdentityDocument;
use crate::keys::mnemonic::{derive_identity_seed, generate_mnemonic, join_words, MnemonicError};
use crate::keys::secp::{KeyError, SecpKeypair};
use crate::signing::{sign_with_agent, sign_with_secp, SignedEnvelope, SigningError};

pub use store::{MemoryStore, SledStore, StoreError, WalletStore};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors from wallet construction, serialization, and persistence.
#[derive(Debug, Error)]
pub enum WalletError {
    /// The supplied mnemonic failed validation.
    #[error(transparent)]
    Mnemonic(#[from] MnemonicError),

    /// Transaction key derivation failed.
    #[error(transparent)]
    Key(#[from] KeyError),

    /// Encryption or decryption of the serialized form failed.
    #[error(transparent)]
    Encryption(#[from] EncryptionError),

    /// The serialized wallet container was malformed or of an unknown format.
    #[error("bad serialized wallet: {0}")]
    BadSerializedForm(String),

    /// The storage collaborator failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// No serialized wallet exists in the store.
    #[error("no wallet found in the store")]
    NotFound,
}

// ---------------------------------------------------------------------------
// Signer Roles & Sources
// ---------------------------------------------------------------------------

/// The two signer roles a wallet holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignerRole {
    /// The secp256k1 transaction key.
    Secp,
    /// The Ed25519 identity (agent) key.
    Agent,
}

impl fmt::Display for SignerRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignerRole::Secp => write!(f, "secp"),
            SignerRole::Agent => write!(f, "agent"),
        }
    }
}

impl FromStr for SignerRole {
    type Err = SigningError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "secp" => Ok(SignerRole::Secp),
            "agent" => Ok(SignerRole::Agent),
            other => Err(SigningError::UnknownSigner(other.to_string())),
        }
    }
}

/// Explicitly tagged wallet input.
#[derive(Debug, Clone)]
pub enum WalletSource {
    /// Generate a fresh 12-word mnemonic.
    Generate,
    /// A full mnemonic phrase, words separated by whitespace.
    Mnemonic(String),
    /// A mnemonic as a word array; joined with single spaces.
    Words(Vec<String>),
    /// A previously serialized wallet (requires the matching password).
    Serialized(String),
}

/// Account facts for one signer role, as remote endpoints see it.
#[derive(Debug, Clone, Serialize)]
pub struct SignerAccount {
    /// Bech32 account address.
    pub address: String,
    /// Signing algorithm label.
    pub algo: String,
    /// Base64 of the raw public key bytes.
    pub pub_key: String,
}

// ---------------------------------------------------------------------------
// Wallet
// ---------------------------------------------------------------------------

/// The session wallet: one mnemonic, two key pairs.
pub struct Wallet {
    mnemonic: Zeroizing<String>,
    secp: SecpKeypair,
    secp_address: String,
    agent: IdentityDocument,
}

impl Wallet {
    /// Construct a wallet from an explicit source.
    ///
    /// `password` is only consulted for [`WalletSource::Serialized`]. For a
    /// serialized source the DID prefix recorded at serialization time wins
    /// over the `did_prefix` argument, so round-trips reproduce the original
    /// identity without the caller restating it.
    pub fn from_source(
        source: WalletSource,
        did_prefix: &str,
        password: &str,
    ) -> Result<Self, WalletError> {
        match source {
            WalletSource::Generate => Self::generate(did_prefix),
            WalletSource::Mnemonic(phrase) => Self::from_mnemonic(&phrase, did_prefix),
            WalletSource::Words(words) => Self::from_mnemonic(&join_words(&words), did_prefix),
            WalletSource::Serialized(serialized) => Self::from_serialized(&serialized, password),
        }
    }

    /// Generate a wallet from fresh entropy (12 words).
    pub fn generate(did_prefix: &str) -> Result<Self, WalletError> {
        let words = generate_mnemonic(DEFAULT_MNEMONIC_WORDS)?;
        Self::from_mnemonic(&join_words(&words), did_prefix)
    }

    /// Derive both key pairs from a mnemonic phrase.
    pub fn from_mnemonic(phrase: &str, did_prefix: &str) -> Result<Self, WalletError> {
        let secp = SecpKeypair::from_mnemonic(phrase, HD_PATH)?;
        let secp_address = secp.address(ADDRESS_HRP)?;
        let identity_seed = derive_identity_seed(phrase)?;
        let agent = IdentityDocument::from_seed(&identity_seed, did_prefix);

        Ok(Self {
            mnemonic: Zeroizing::new(phrase.to_string()),
            secp,
            secp_address,
            agent,
        })
    }

    /// Reconstruct a wallet from its encrypted serialized form.
    pub fn from_serialized(serialized: &str, password: &str) -> Result<Self, WalletError> {
        let plaintext = persist::decrypt_wallet(serialized, password)?;
        Self::from_mnemonic(&plaintext.mnemonic, &plaintext.did_prefix)
    }

    /// The mnemonic phrase this wallet derives from.
    pub fn mnemonic(&self) -> &str {
        &self.mnemonic
    }

    /// The transaction key pair.
    pub fn secp(&self) -> &SecpKeypair {
        &self.secp
    }

    /// The identity document (agent key pair).
    pub fn agent(&self) -> &IdentityDocument {
        &self.agent
    }

    /// The agent DID, prefix included.
    pub fn did(&self) -> &str {
        self.agent.did()
    }

    /// The bech32 address of the transaction key.
    pub fn secp_address(&self) -> &str {
        &self.secp_address
    }

    /// Account facts for a signer role.
    pub fn account(&self, role: SignerRole) -> SignerAccount {
        match role {
            SignerRole::Secp => SignerAccount {
                address: self.secp_address.clone(),
                algo: "secp256k1".to_string(),
                pub_key: to_base64(&self.secp.public_key_bytes()),
            },
            SignerRole::Agent => SignerAccount {
                address: self.agent.address(),
                algo: AGENT_SIGN_ALGO.to_string(),
                pub_key: to_base64(&self.agent.public_key_bytes()),
            },
        }
    }

    /// Sign a payload with the requested role's key.
    ///
    /// Canonicalizes the payload and returns the verifiable envelope. Safe
    /// to call concurrently — signing reads immutable key material only.
    pub fn sign<T: Serialize>(
        &self,
        role: SignerRole,
        payload: &T,
    ) -> Result<SignedEnvelope, SigningError> {
        match role {
            SignerRole::Secp => sign_with_secp(payload, &self.secp),
            SignerRole::Agent => sign_with_agent(payload, &self.agent),
        }
    }

    /// Produce the encrypted serialized form, keyed by `password`.
    ///
    /// Round-trips through [`Wallet::from_serialized`] to an operationally
    /// equivalent wallet: same DID, same addresses.
    pub fn serialize(&self, password: &str) -> Result<String, WalletError> {
        persist::encrypt_wallet(&self.mnemonic, self.agent.did_prefix(), password)
    }

    /// Serialize and write this wallet to a store under the fixed key.
    pub async fn persist(
        &self,
        store: &dyn WalletStore,
        password: &str,
    ) -> Result<(), WalletError> {
        let serialized = self.serialize(password)?;
        store.set_item(WALLET_STORAGE_KEY, &serialized).await?;
        Ok(())
    }

    /// Load and decrypt the wallet persisted in a store.
    pub async fn load(store: &dyn WalletStore, password: &str) -> Result<Self, WalletError> {
        let serialized = store
            .get_item(WALLET_STORAGE_KEY)
            .await?
            .ok_or(WalletError::NotFound)?;
        Self::from_serialized(&serialized, password)
    }
}

impl fmt::Debug for Wallet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Neither the mnemonic nor any secret key appears in Debug output.
        f.debug_struct("Wallet")
            .field("did", &self.agent.did())
            .field("secp_address", &self.secp_address)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DID_PREFIX;
    use crate::signing::verify_envelope;
    use serde_json::json;

    const FIXTURE: &str =
        "sun current mango evolve elite evolve slow inch used shoot dog soldier";

    fn fixture_wallet() -> Wallet {
        Wallet::from_mnemonic(FIXTURE, DID_PREFIX).unwrap()
    }

    #[test]
    fn fixture_wallet_is_stable_across_derivations() {
        // The golden fixture: same phrase, same prefix, same identity and
        // address every time.
        let a = fixture_wallet();
        let b = fixture_wallet();
        assert_eq!(a.did(), b.did());
        assert_eq!(a.secp_address(), b.secp_address());
        assert_eq!(a.agent().verify_key(), b.agent().verify_key());
    }

    #[test]
    fn word_array_source_equals_phrase_source() {
        let words: Vec<String> = FIXTURE.split(' ').map(str::to_string).collect();
        let from_words =
            Wallet::from_source(WalletSource::Words(words), DID_PREFIX, "").unwrap();
        let from_phrase = fixture_wallet();
        assert_eq!(from_words.did(), from_phrase.did());
        assert_eq!(from_words.secp_address(), from_phrase.secp_address());
    }

    #[test]
    fn generated_wallets_are_distinct() {
        let a = Wallet::from_source(WalletSource::Generate, DID_PREFIX, "").unwrap();
        let b = Wallet::from_source(WalletSource::Generate, DID_PREFIX, "").unwrap();
        assert_ne!(a.did(), b.did());
        assert_ne!(a.secp_address(), b.secp_address());
        assert_eq!(a.mnemonic().split(' ').count(), 12);
    }

    #[test]
    fn invalid_phrase_never_builds_a_partial_wallet() {
        let result = Wallet::from_mnemonic("sun current mango", DID_PREFIX);
        assert!(matches!(result, Err(WalletError::Mnemonic(_))));
    }

    #[test]
    fn serialize_roundtrip_preserves_identity() {
        let original = fixture_wallet();
        let serialized = original.serialize("pass-phrase").unwrap();
        let recovered = Wallet::from_serialized(&serialized, "pass-phrase").unwrap();

        assert_eq!(recovered.did(), original.did());
        assert_eq!(recovered.secp_address(), original.secp_address());
        assert_eq!(recovered.mnemonic(), original.mnemonic());
    }

    #[test]
    fn serialized_source_ignores_caller_prefix() {
        let original = Wallet::from_mnemonic(FIXTURE, "did:sov:").unwrap();
        let serialized = original.serialize("pw").unwrap();
        let recovered = Wallet::from_source(
            WalletSource::Serialized(serialized),
            DID_PREFIX, // overridden by the recorded prefix
            "pw",
        )
        .unwrap();
        assert!(recovered.did().starts_with("did:sov:"));
        assert_eq!(recovered.did(), original.did());
    }

    #[test]
    fn wrong_password_fails_deserialization() {
        let serialized = fixture_wallet().serialize("right").unwrap();
        assert!(Wallet::from_serialized(&serialized, "wrong").is_err());
    }

    #[test]
    fn both_roles_sign_verifiably() {
        let wallet = fixture_wallet();
        let payload = json!({"projectDid": "did:ixo:abc"});

        for role in [SignerRole::Secp, SignerRole::Agent] {
            let envelope = wallet.sign(role, &payload).unwrap();
            assert!(verify_envelope(&envelope).unwrap(), "role {role} failed");
        }
    }

    #[test]
    fn account_facts_per_role() {
        let wallet = fixture_wallet();

        let secp = wallet.account(SignerRole::Secp);
        assert_eq!(secp.address, wallet.secp_address());
        assert_eq!(secp.algo, "secp256k1");

        let agent = wallet.account(SignerRole::Agent);
        assert_eq!(agent.algo, "ed25519-sha-256");
        assert!(agent.address.starts_with("ixo1"));
        assert_ne!(agent.address, secp.address);
    }

    #[test]
    fn signer_role_parsing() {
        assert_eq!("secp".parse::<SignerRole>().unwrap(), SignerRole::Secp);
        assert_eq!("agent".parse::<SignerRole>().unwrap(), SignerRole::Agent);
        assert!(matches!(
            "validator".parse::<SignerRole>(),
            Err(SigningError::UnknownSigner(_))
        ));
    }

    #[test]
    fn debug_hides_mnemonic() {
        let wallet = fixture_wallet();
        let debug = format!("{wallet:?}");
        assert!(!debug.contains("mango"));
        assert!(debug.contains(wallet.did()));
    }

    #[tokio::test]
    async fn persist_and_load_via_store() {
        let store = MemoryStore::new();
        let wallet = fixture_wallet();

        wallet.persist(&store, "storage-pw").await.unwrap();
        let loaded = Wallet::load(&store, "storage-pw").await.unwrap();
        assert_eq!(loaded.did(), wallet.did());
        assert_eq!(loaded.secp_address(), wallet.secp_address());
    }

    #[tokio::test]
    async fn load_from_empty_store_is_not_found() {
        let store = MemoryStore::new();
        assert!(matches!(
            Wallet::load(&store, "pw").await,
            Err(WalletError::NotFound)
        ));
    }
}
