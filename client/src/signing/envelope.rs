//! # Signed Envelopes
//!
//! The wire shape produced by every signing call:
//!
//! ```json
//! {
//!   "signed": { ...original payload... },
//!   "signature": {
//!     "signature": "<base64, 64 bytes>",
//!     "pub_key": { "type": "tendermint/PubKeyEd25519", "value": "<base64>" }
//!   }
//! }
//! ```
//!
//! The signature is always over the *canonical* serialization of `signed`,
//! so any holder of a structurally equal payload can re-derive the signing
//! input and verify against the embedded public key. The `pub_key.type`
//! literals are matched bit-exact by remote verifiers.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::{ED25519_PUBKEY_TYPE, SECP256K1_PUBKEY_TYPE, SIGNATURE_LENGTH};
use crate::crypto::encoding::{from_base64, to_base64};
use crate::identity::IdentityDocument;
use crate::keys::secp::SecpKeypair;
use crate::signing::canonical::{canonicalize, SerializationError};
use crate::signing::SigningError;

/// Algorithm tag plus base64 public key, as carried inside a signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PubKey {
    /// Algorithm tag, e.g. `tendermint/PubKeyEd25519`.
    #[serde(rename = "type")]
    pub type_: String,
    /// Base64 of the raw public key bytes.
    pub value: String,
}

/// A detached signature over a canonicalized payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureObject {
    /// Base64 of the 64-byte signature.
    pub signature: String,
    /// The key that produced the signature.
    pub pub_key: PubKey,
}

/// A payload together with its signature. Immutable once produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignedEnvelope {
    /// The original payload, untouched.
    pub signed: Value,
    /// Signature over the canonical serialization of `signed`.
    pub signature: SignatureObject,
}

/// Sign a payload with the agent (Ed25519) identity.
///
/// Ed25519 emits exactly 64 signature bytes; the slice keeps the envelope
/// at 64 even if the underlying primitive ever appends auxiliary material.
pub fn sign_with_agent<T: Serialize>(
    payload: &T,
    identity: &IdentityDocument,
) -> Result<SignedEnvelope, SigningError> {
    let signed = serde_json::to_value(payload)
        .map_err(|e| SerializationError::Unserializable(e.to_string()))?;
    let canonical = canonicalize(&signed)?;
    let signature = identity.sign(&canonical);

    Ok(SignedEnvelope {
        signed,
        signature: SignatureObject {
            signature: to_base64(&signature[..SIGNATURE_LENGTH]),
            pub_key: PubKey {
                type_: ED25519_PUBKEY_TYPE.to_string(),
                value: to_base64(&identity.public_key_bytes()),
            },
        },
    })
}

/// Sign a payload with the transaction (secp256k1) key pair.
pub fn sign_with_secp<T: Serialize>(
    payload: &T,
    keypair: &SecpKeypair,
) -> Result<SignedEnvelope, SigningError> {
    let signed = serde_json::to_value(payload)
        .map_err(|e| SerializationError::Unserializable(e.to_string()))?;
    let canonical = canonicalize(&signed)?;
    let signature = keypair.sign(&canonical);

    Ok(SignedEnvelope {
        signed,
        signature: SignatureObject {
            signature: to_base64(&signature[..SIGNATURE_LENGTH]),
            pub_key: PubKey {
                type_: SECP256K1_PUBKEY_TYPE.to_string(),
                value: to_base64(&keypair.public_key_bytes()),
            },
        },
    })
}

/// Verify a signed envelope against its embedded public key.
///
/// Re-canonicalizes `signed`, decodes the signature and key, and dispatches
/// on the `pub_key.type` tag. Returns `Ok(false)` for a well-formed envelope
/// whose signature simply does not verify; malformed encodings are errors.
pub fn verify_envelope(envelope: &SignedEnvelope) -> Result<bool, SigningError> {
    let canonical = canonicalize(&envelope.signed)?;
    let signature = from_base64(&envelope.signature.signature)
        .map_err(|e| SigningError::MalformedSignature(e.to_string()))?;
    let public_key = from_base64(&envelope.signature.pub_key.value)
        .map_err(|e| SigningError::MalformedSignature(e.to_string()))?;

    match envelope.signature.pub_key.type_.as_str() {
        ED25519_PUBKEY_TYPE => {
            let key_bytes: [u8; 32] = public_key
                .as_slice()
                .try_into()
                .map_err(|_| SigningError::MalformedSignature("bad ed25519 key length".into()))?;
            let sig_bytes: [u8; SIGNATURE_LENGTH] = signature
                .as_slice()
                .try_into()
                .map_err(|_| SigningError::MalformedSignature("bad signature length".into()))?;

            let Ok(verifying_key) = ed25519_dalek::VerifyingKey::from_bytes(&key_bytes) else {
                return Ok(false);
            };
            let signature = ed25519_dalek::Signature::from_bytes(&sig_bytes);
            use ed25519_dalek::Verifier as _;
            Ok(verifying_key.verify(&canonical, &signature).is_ok())
        }
        SECP256K1_PUBKEY_TYPE => {
            let Ok(verifying_key) = k256::ecdsa::VerifyingKey::from_sec1_bytes(&public_key) else {
                return Ok(false);
            };
            let Ok(signature) = k256::ecdsa::Signature::from_slice(&signature) else {
                return Ok(false);
            };
            use k256::ecdsa::signature::Verifier as _;
            Ok(verifying_key.verify(&canonical, &signature).is_ok())
        }
        other => Err(SigningError::MalformedSignature(format!(
            "unknown pub_key type: {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HD_PATH;
    use crate::keys::mnemonic::derive_identity_seed;
    use serde_json::json;

    const FIXTURE: &str =
        "sun current mango evolve elite evolve slow inch used shoot dog soldier";

    fn identity() -> IdentityDocument {
        IdentityDocument::from_seed_default(&derive_identity_seed(FIXTURE).unwrap())
    }

    fn secp() -> SecpKeypair {
        SecpKeypair::from_mnemonic(FIXTURE, HD_PATH).unwrap()
    }

    #[test]
    fn agent_envelope_verifies() {
        let payload = json!({"projectDid": "did:ixo:abc", "status": "CREATED"});
        let envelope = sign_with_agent(&payload, &identity()).unwrap();
        assert!(verify_envelope(&envelope).unwrap());
    }

    #[test]
    fn secp_envelope_verifies() {
        let payload = json!({"msgs": [], "memo": ""});
        let envelope = sign_with_secp(&payload, &secp()).unwrap();
        assert!(verify_envelope(&envelope).unwrap());
    }

    #[test]
    fn envelope_preserves_payload() {
        let payload = json!({"key": "value", "nested": {"n": 1}});
        let envelope = sign_with_agent(&payload, &identity()).unwrap();
        assert_eq!(envelope.signed, payload);
    }

    #[test]
    fn pub_key_type_literals() {
        let agent = sign_with_agent(&json!({}), &identity()).unwrap();
        assert_eq!(agent.signature.pub_key.type_, "tendermint/PubKeyEd25519");

        let tx = sign_with_secp(&json!({}), &secp()).unwrap();
        assert_eq!(tx.signature.pub_key.type_, "tendermint/PubKeySecp256k1");
    }

    #[test]
    fn signature_is_64_bytes_base64() {
        let envelope = sign_with_agent(&json!({"a": 1}), &identity()).unwrap();
        let raw = from_base64(&envelope.signature.signature).unwrap();
        assert_eq!(raw.len(), SIGNATURE_LENGTH);
    }

    #[test]
    fn key_order_does_not_change_signature() {
        let a: Value = serde_json::from_str(r#"{"x": 1, "y": 2}"#).unwrap();
        let b: Value = serde_json::from_str(r#"{"y": 2, "x": 1}"#).unwrap();
        let id = identity();
        let sig_a = sign_with_agent(&a, &id).unwrap();
        let sig_b = sign_with_agent(&b, &id).unwrap();
        assert_eq!(sig_a.signature.signature, sig_b.signature.signature);
    }

    #[test]
    fn tampered_payload_fails_verification() {
        let mut envelope = sign_with_agent(&json!({"amount": 10}), &identity()).unwrap();
        envelope.signed = json!({"amount": 1000});
        assert!(!verify_envelope(&envelope).unwrap());
    }

    #[test]
    fn tampered_signature_fails_verification() {
        let mut envelope = sign_with_agent(&json!({"a": 1}), &identity()).unwrap();
        let mut raw = from_base64(&envelope.signature.signature).unwrap();
        raw[0] ^= 0xFF;
        envelope.signature.signature = to_base64(&raw);
        assert!(!verify_envelope(&envelope).unwrap());
    }

    #[test]
    fn unknown_pub_key_type_is_an_error() {
        let mut envelope = sign_with_agent(&json!({"a": 1}), &identity()).unwrap();
        envelope.signature.pub_key.type_ = "tendermint/PubKeySr25519".into();
        assert!(matches!(
            verify_envelope(&envelope),
            Err(SigningError::MalformedSignature(_))
        ));
    }

    #[test]
    fn envelope_serde_roundtrip() {
        let envelope = sign_with_agent(&json!({"a": 1}), &identity()).unwrap();
        let json = serde_json::to_string(&envelope).unwrap();
        assert!(json.contains(r#""pub_key""#));
        assert!(json.contains(r#""type":"tendermint/PubKeyEd25519""#));
        let back: SignedEnvelope = serde_json::from_str(&json).unwrap();
        assert!(verify_envelope(&back).unwrap());
    }
}
