//! # Identity Document (Agent Key Pair)
//!
//! The application-level identity used to sign cell-node requests, distinct
//! from the ledger transaction key. An [`IdentityDocument`] binds:
//!
//! - a **DID** — `<prefix><base-identifier>`, where the base identifier is
//!   the Base58Check encoding of the first 16 bytes of
//!   `SHA-256(public_key)`. Checksum-bearing, address-style, one-way.
//! - a **verify key** — the raw Ed25519 public key, base58-encoded, which
//!   remote verifiers resolve from the DID record.
//! - a **signing key** — the Ed25519 secret, held in memory only.
//!
//! Construction is a pure function of the 32-byte identity seed and the DID
//! prefix: no I/O, no randomness. Two invocations with the same inputs yield
//! the same document, which is what makes wallet recovery possible.

use ed25519_dalek::{Signature, Signer, SigningKey, Verifier};

use crate::config::{
    ADDRESS_HRP, AGENT_ADDRESS_HASH_BYTES, DID_ID_HASH_BYTES, DID_PREFIX, SIGNATURE_LENGTH,
};
use crate::crypto::hash::sha256_array;

/// The agent identity: DID, verification key, and signing key.
pub struct IdentityDocument {
    did: String,
    did_prefix: String,
    verify_key: String,
    signing_key: SigningKey,
}

impl IdentityDocument {
    /// Build the identity document from a 32-byte seed.
    ///
    /// The seed comes from [`derive_identity_seed`](crate::keys::derive_identity_seed);
    /// passing anything else produces a valid but unrecoverable identity.
    pub fn from_seed(seed: &[u8; 32], did_prefix: &str) -> Self {
        let signing_key = SigningKey::from_bytes(seed);
        let public_bytes = signing_key.verifying_key().to_bytes();

        let verify_key = bs58::encode(public_bytes).into_string();
        let digest = sha256_array(&public_bytes);
        let base_identifier = bs58::encode(&digest[..DID_ID_HASH_BYTES])
            .with_check()
            .into_string();

        Self {
            did: format!("{did_prefix}{base_identifier}"),
            did_prefix: did_prefix.to_string(),
            verify_key,
            signing_key,
        }
    }

    /// Same as [`from_seed`] with the default `did:ixo:` prefix.
    pub fn from_seed_default(seed: &[u8; 32]) -> Self {
        Self::from_seed(seed, DID_PREFIX)
    }

    /// The full DID string, prefix included.
    pub fn did(&self) -> &str {
        &self.did
    }

    /// The DID prefix this document was built with.
    pub fn did_prefix(&self) -> &str {
        &self.did_prefix
    }

    /// Base58-encoded Ed25519 public key.
    pub fn verify_key(&self) -> &str {
        &self.verify_key
    }

    /// Raw Ed25519 public key bytes.
    pub fn public_key_bytes(&self) -> [u8; 32] {
        self.signing_key.verifying_key().to_bytes()
    }

    /// Base58-encoded secret signing key.
    ///
    /// Part of the document's secret section; callers that only need to sign
    /// should use [`sign`](Self::sign) and never touch this.
    pub fn secret_sign_key(&self) -> String {
        bs58::encode(self.signing_key.to_bytes()).into_string()
    }

    /// Bech32 account address for the agent key:
    /// `bech32("ixo", sha256(public_key)[..20])`.
    ///
    /// This is the address the chain's auth module knows the agent by when
    /// it broadcasts DID and bond messages.
    pub fn address(&self) -> String {
        let hrp = bech32::Hrp::parse(ADDRESS_HRP).expect("static HRP is valid");
        let digest = sha256_array(&self.public_key_bytes());
        bech32::encode::<bech32::Bech32>(hrp, &digest[..AGENT_ADDRESS_HASH_BYTES])
            .expect("encoding a 20-byte payload never fails")
    }

    /// Ed25519-sign a message. Always exactly 64 bytes of signature.
    pub fn sign(&self, message: &[u8]) -> [u8; SIGNATURE_LENGTH] {
        self.signing_key.sign(message).to_bytes()
    }

    /// Verify a signature against this document's public key.
    pub fn verify(&self, message: &[u8], signature: &[u8]) -> bool {
        let Ok(sig_bytes) = <[u8; SIGNATURE_LENGTH]>::try_from(signature) else {
            return false;
        };
        let signature = Signature::from_bytes(&sig_bytes);
        self.signing_key
            .verifying_key()
            .verify(message, &signature)
            .is_ok()
    }
}

impl Clone for IdentityDocument {
    fn clone(&self) -> Self {
        Self {
            did: self.did.clone(),
            did_prefix: self.did_prefix.clone(),
            verify_key: self.verify_key.clone(),
            signing_key: SigningKey::from_bytes(&self.signing_key.to_bytes()),
        }
    }
}

impl std::fmt::Debug for IdentityDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // The signing key stays out of Debug output.
        write!(f, "IdentityDocument(did={})", self.did)
    }
}

impl PartialEq for IdentityDocument {
    fn eq(&self, other: &Self) -> bool {
        self.did == other.did && self.verify_key == other.verify_key
    }
}

impl Eq for IdentityDocument {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::mnemonic::derive_identity_seed;

    const FIXTURE: &str =
        "sun current mango evolve elite evolve slow inch used shoot dog soldier";

    fn fixture_doc() -> IdentityDocument {
        let seed = derive_identity_seed(FIXTURE).unwrap();
        IdentityDocument::from_seed_default(&seed)
    }

    #[test]
    fn derivation_is_deterministic() {
        let a = fixture_doc();
        let b = fixture_doc();
        assert_eq!(a, b);
        assert_eq!(a.did(), b.did());
        assert_eq!(a.address(), b.address());
        assert_eq!(a.verify_key(), b.verify_key());
    }

    #[test]
    fn did_carries_prefix() {
        let doc = fixture_doc();
        assert!(doc.did().starts_with("did:ixo:"), "did was: {}", doc.did());
        assert!(doc.did().len() > "did:ixo:".len());
    }

    #[test]
    fn custom_prefix_respected() {
        let seed = derive_identity_seed(FIXTURE).unwrap();
        let doc = IdentityDocument::from_seed(&seed, "did:sov:");
        assert!(doc.did().starts_with("did:sov:"));
        assert_eq!(doc.did_prefix(), "did:sov:");
    }

    #[test]
    fn base_identifier_is_base58check_of_hashed_key() {
        let doc = fixture_doc();
        let base = doc.did().strip_prefix("did:ixo:").unwrap();
        let decoded = bs58::decode(base).with_check(None).into_vec().unwrap();
        let expected = sha256_array(&doc.public_key_bytes());
        assert_eq!(decoded, expected[..DID_ID_HASH_BYTES].to_vec());
    }

    #[test]
    fn verify_key_decodes_to_public_key() {
        let doc = fixture_doc();
        let decoded = bs58::decode(doc.verify_key()).into_vec().unwrap();
        assert_eq!(decoded, doc.public_key_bytes().to_vec());
    }

    #[test]
    fn address_shape() {
        let doc = fixture_doc();
        assert!(doc.address().starts_with("ixo1"), "got: {}", doc.address());
    }

    #[test]
    fn agent_address_differs_from_did_identifier() {
        let doc = fixture_doc();
        assert_ne!(doc.address(), doc.did().strip_prefix("did:ixo:").unwrap());
    }

    #[test]
    fn different_seeds_different_identities() {
        let a = IdentityDocument::from_seed_default(&[1u8; 32]);
        let b = IdentityDocument::from_seed_default(&[2u8; 32]);
        assert_ne!(a.did(), b.did());
        assert_ne!(a.verify_key(), b.verify_key());
    }

    #[test]
    fn sign_verify_roundtrip() {
        let doc = fixture_doc();
        let msg = b"{\"data\":{}}";
        let sig = doc.sign(msg);
        assert_eq!(sig.len(), SIGNATURE_LENGTH);
        assert!(doc.verify(msg, &sig));
        assert!(!doc.verify(b"other message", &sig));
    }

    #[test]
    fn verify_rejects_malformed_signature() {
        let doc = fixture_doc();
        assert!(!doc.verify(b"msg", &[0u8; 12]));
    }

    #[test]
    fn signatures_are_deterministic() {
        let doc = fixture_doc();
        assert_eq!(doc.sign(b"same"), doc.sign(b"same"));
    }

    #[test]
    fn debug_does_not_leak_secret() {
        let doc = fixture_doc();
        let debug = format!("{doc:?}");
        assert!(debug.contains(doc.did()));
        assert!(!debug.contains(&doc.secret_sign_key()));
    }
}
