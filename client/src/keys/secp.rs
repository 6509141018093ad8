//! # Transaction Key Pair (secp256k1)
//!
//! Hierarchical-deterministic derivation of the ledger signing key from a
//! BIP-39 mnemonic. The chain follows the standard construction:
//!
//! ```text
//! mnemonic -> BIP-39 seed (64 bytes)
//!          -> HMAC-SHA512("Bitcoin seed", seed) -> master key + chain code
//!          -> m/44'/118'/0'/0/0 -> secp256k1 signing key
//!          -> bech32(hrp, ripemd160(sha256(compressed_pubkey))) -> address
//! ```
//!
//! Derivation is pure: the same phrase and path always produce the same key
//! and address. Signatures are ECDSA over SHA-256 with the low-S
//! normalization the chain requires.

use hmac::{Hmac, Mac};
use k256::ecdsa::signature::{Signer, Verifier};
use k256::ecdsa::{Signature, SigningKey, VerifyingKey};
use k256::elliptic_curve::ops::Reduce;
use k256::elliptic_curve::sec1::ToEncodedPoint;
use k256::{Scalar, SecretKey, U256};
use sha2::Sha512;
use thiserror::Error;
use zeroize::Zeroize;

use crate::config::SIGNATURE_LENGTH;
use crate::crypto::hash::hash160;
use crate::keys::mnemonic::{mnemonic_to_seed, parse_mnemonic, MnemonicError};

type HmacSha512 = Hmac<Sha512>;

/// Domain separator for the BIP-32 master key.
const MASTER_HMAC_KEY: &[u8] = b"Bitcoin seed";

/// Hardened-derivation index offset.
const HARDENED_OFFSET: u32 = 0x8000_0000;

/// Errors from transaction key derivation and address encoding.
#[derive(Debug, Error)]
pub enum KeyError {
    /// The mnemonic failed validation.
    #[error(transparent)]
    Mnemonic(#[from] MnemonicError),

    /// A derived scalar fell outside the valid secp256k1 range.
    /// Probability on the order of 2^-127 per step; surfaced rather than
    /// silently re-derived so that callers notice if it ever happens.
    #[error("child key derivation produced an invalid scalar")]
    InvalidChildKey,

    /// The derivation path string could not be parsed.
    #[error("invalid derivation path component: {0}")]
    InvalidPath(String),

    /// The bech32 human-readable prefix is malformed.
    #[error("invalid bech32 prefix: {0}")]
    InvalidPrefix(String),
}

// ---------------------------------------------------------------------------
// Extended Key (BIP-32)
// ---------------------------------------------------------------------------

/// A BIP-32 extended private key: secret scalar plus chain code.
///
/// Internal to the derivation walk; callers only ever see the final
/// [`SecpKeypair`].
struct ExtendedKey {
    secret: SecretKey,
    chain_code: [u8; 32],
}

impl Drop for ExtendedKey {
    fn drop(&mut self) {
        // SecretKey zeroizes itself; the chain code is key material too.
        self.chain_code.zeroize();
    }
}

impl ExtendedKey {
    /// Build the master key from a BIP-39 seed.
    fn master(seed: &[u8]) -> Result<Self, KeyError> {
        let mut mac = HmacSha512::new_from_slice(MASTER_HMAC_KEY)
            .map_err(|_| KeyError::InvalidChildKey)?;
        mac.update(seed);
        let digest = mac.finalize().into_bytes();

        let secret =
            SecretKey::from_slice(&digest[..32]).map_err(|_| KeyError::InvalidChildKey)?;
        let mut chain_code = [0u8; 32];
        chain_code.copy_from_slice(&digest[32..]);

        Ok(Self { secret, chain_code })
    }

    /// Derive one child key.
    ///
    /// Hardened children commit to the parent secret key, normal children to
    /// the parent public key, per BIP-32.
    fn child(&self, index: u32, hardened: bool) -> Result<Self, KeyError> {
        let child_index = if hardened {
            index | HARDENED_OFFSET
        } else {
            index
        };

        let mut mac = HmacSha512::new_from_slice(&self.chain_code)
            .map_err(|_| KeyError::InvalidChildKey)?;

        if hardened {
            mac.update(&[0u8]);
            mac.update(&self.secret.to_bytes());
        } else {
            let point = self.secret.public_key().to_encoded_point(true);
            mac.update(point.as_bytes());
        }
        mac.update(&child_index.to_be_bytes());
        let digest = mac.finalize().into_bytes();

        // child = parse256(IL) + parent (mod n)
        let il = U256::from_be_slice(&digest[..32]);
        let il_scalar = <Scalar as Reduce<U256>>::reduce(il);
        let parent = U256::from_be_slice(&self.secret.to_bytes());
        let parent_scalar = <Scalar as Reduce<U256>>::reduce(parent);
        let child_scalar = il_scalar + parent_scalar;

        let child_bytes: [u8; 32] = child_scalar.to_bytes().into();
        let secret = SecretKey::from_slice(&child_bytes).map_err(|_| KeyError::InvalidChildKey)?;

        let mut chain_code = [0u8; 32];
        chain_code.copy_from_slice(&digest[32..]);

        Ok(Self { secret, chain_code })
    }

    /// Walk a `m/44'/118'/0'/0/0`-style path string.
    fn derive_path(mut self, path: &str) -> Result<Self, KeyError> {
        let trimmed = path.trim();
        let rest = trimmed
            .strip_prefix("m/")
            .or_else(|| trimmed.strip_prefix("M/"))
            .ok_or_else(|| {
                KeyError::InvalidPath(format!("path must start with 'm/': {trimmed}"))
            })?;

        for component in rest.split('/') {
            if component.is_empty() {
                continue;
            }
            let (index_str, hardened) = match component.strip_suffix('\'') {
                Some(rest) => (rest, true),
                None => match component.strip_suffix('h') {
                    Some(rest) => (rest, true),
                    None => (component, false),
                },
            };
            let index: u32 = index_str
                .parse()
                .map_err(|_| KeyError::InvalidPath(component.to_string()))?;
            self = self.child(index, hardened)?;
        }

        Ok(self)
    }
}

// ---------------------------------------------------------------------------
// SecpKeypair
// ---------------------------------------------------------------------------

/// The ledger transaction signing key pair.
///
/// Owned exclusively by the wallet aggregate; the secret scalar never leaves
/// this type except through the wallet's encrypted serialized form (which
/// stores the mnemonic, not the scalar).
pub struct SecpKeypair {
    secret: SecretKey,
}

impl SecpKeypair {
    /// Derive the key pair from a mnemonic phrase at the given path.
    ///
    /// Deterministic; fails only on an invalid phrase or path.
    pub fn from_mnemonic(phrase: &str, hd_path: &str) -> Result<Self, KeyError> {
        let mnemonic = parse_mnemonic(phrase)?;
        let seed = mnemonic_to_seed(&mnemonic);
        let leaf = ExtendedKey::master(&seed)?.derive_path(hd_path)?;
        Ok(Self {
            secret: leaf.secret.clone(),
        })
    }

    /// Compressed SEC1 public key (33 bytes).
    pub fn public_key_bytes(&self) -> [u8; 33] {
        let point = self.secret.public_key().to_encoded_point(true);
        let mut out = [0u8; 33];
        out.copy_from_slice(point.as_bytes());
        out
    }

    /// Bech32 account address: `hrp1...` over `hash160(compressed_pubkey)`.
    pub fn address(&self, hrp: &str) -> Result<String, KeyError> {
        let hrp = bech32::Hrp::parse(hrp).map_err(|e| KeyError::InvalidPrefix(e.to_string()))?;
        let digest = hash160(&self.public_key_bytes());
        bech32::encode::<bech32::Bech32>(hrp, &digest)
            .map_err(|e| KeyError::InvalidPrefix(e.to_string()))
    }

    /// ECDSA-sign a message (SHA-256 digested internally, low-S normalized).
    ///
    /// Returns the 64-byte compact `r || s` form.
    pub fn sign(&self, message: &[u8]) -> [u8; SIGNATURE_LENGTH] {
        let signing_key = SigningKey::from(&self.secret);
        let signature: Signature = signing_key.sign(message);
        let signature = signature.normalize_s().unwrap_or(signature);

        let mut out = [0u8; SIGNATURE_LENGTH];
        out.copy_from_slice(&signature.to_bytes());
        out
    }

    /// Verify a compact signature against this key pair's public key.
    pub fn verify(&self, message: &[u8], signature: &[u8]) -> bool {
        let Ok(signature) = Signature::from_slice(signature) else {
            return false;
        };
        let signing_key = SigningKey::from(&self.secret);
        signing_key.verifying_key().verify(message, &signature).is_ok()
    }
}

impl Clone for SecpKeypair {
    fn clone(&self) -> Self {
        Self {
            secret: self.secret.clone(),
        }
    }
}

impl std::fmt::Debug for SecpKeypair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Secret material never reaches Debug output.
        write!(f, "SecpKeypair(pub={})", hex::encode(self.public_key_bytes()))
    }
}

impl PartialEq for SecpKeypair {
    fn eq(&self, other: &Self) -> bool {
        self.public_key_bytes() == other.public_key_bytes()
    }
}

impl Eq for SecpKeypair {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ADDRESS_HRP, HD_PATH};
    use crate::keys::mnemonic::{generate_mnemonic, join_words};

    const FIXTURE: &str =
        "sun current mango evolve elite evolve slow inch used shoot dog soldier";

    #[test]
    fn derivation_is_deterministic() {
        let a = SecpKeypair::from_mnemonic(FIXTURE, HD_PATH).unwrap();
        let b = SecpKeypair::from_mnemonic(FIXTURE, HD_PATH).unwrap();
        assert_eq!(a, b);
        assert_eq!(
            a.address(ADDRESS_HRP).unwrap(),
            b.address(ADDRESS_HRP).unwrap()
        );
    }

    #[test]
    fn different_mnemonics_different_keys() {
        let fixture = SecpKeypair::from_mnemonic(FIXTURE, HD_PATH).unwrap();
        let other_phrase = join_words(&generate_mnemonic(12).unwrap());
        let other = SecpKeypair::from_mnemonic(&other_phrase, HD_PATH).unwrap();
        assert_ne!(fixture, other);
    }

    #[test]
    fn different_paths_different_keys() {
        let a = SecpKeypair::from_mnemonic(FIXTURE, "m/44'/118'/0'/0/0").unwrap();
        let b = SecpKeypair::from_mnemonic(FIXTURE, "m/44'/118'/0'/0/1").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn address_carries_hrp() {
        let kp = SecpKeypair::from_mnemonic(FIXTURE, HD_PATH).unwrap();
        let address = kp.address(ADDRESS_HRP).unwrap();
        assert!(address.starts_with("ixo1"), "address was: {address}");
    }

    #[test]
    fn invalid_mnemonic_rejected() {
        let result = SecpKeypair::from_mnemonic("definitely not a mnemonic", HD_PATH);
        assert!(matches!(result, Err(KeyError::Mnemonic(_))));
    }

    #[test]
    fn invalid_path_rejected() {
        assert!(matches!(
            SecpKeypair::from_mnemonic(FIXTURE, "44'/118'/0'/0/0"),
            Err(KeyError::InvalidPath(_))
        ));
        assert!(matches!(
            SecpKeypair::from_mnemonic(FIXTURE, "m/44'/abc/0"),
            Err(KeyError::InvalidPath(_))
        ));
    }

    #[test]
    fn sign_verify_roundtrip() {
        let kp = SecpKeypair::from_mnemonic(FIXTURE, HD_PATH).unwrap();
        let msg = b"{\"msgs\":[]}";
        let sig = kp.sign(msg);
        assert!(kp.verify(msg, &sig));
        assert!(!kp.verify(b"different message", &sig));
    }

    #[test]
    fn signature_is_compact_and_deterministic_input_sized() {
        let kp = SecpKeypair::from_mnemonic(FIXTURE, HD_PATH).unwrap();
        let sig = kp.sign(b"payload");
        assert_eq!(sig.len(), SIGNATURE_LENGTH);
    }

    #[test]
    fn public_key_is_compressed() {
        let kp = SecpKeypair::from_mnemonic(FIXTURE, HD_PATH).unwrap();
        let pk = kp.public_key_bytes();
        assert!(pk[0] == 0x02 || pk[0] == 0x03);
    }

    #[test]
    fn debug_does_not_leak_secret() {
        let kp = SecpKeypair::from_mnemonic(FIXTURE, HD_PATH).unwrap();
        let debug = format!("{kp:?}");
        assert!(debug.starts_with("SecpKeypair(pub="));
        assert!(!debug.contains(&hex::encode(kp.secret.to_bytes())));
    }
}
