//! # Canonical Signing Pipeline
//!
//! The one genuinely load-bearing subsystem of the SDK. Every signature —
//! ledger transaction or cell-node request — goes through the same steps:
//!
//! 1. Canonicalize the payload (sorted-key JSON, no whitespace).
//! 2. Sign the canonical bytes with the holder's secret key.
//! 3. Base64 the 64-byte signature and the raw public key.
//! 4. Wrap both in a [`SignedEnvelope`] whose `pub_key.type` tag tells the
//!    verifier which curve to use.
//!
//! Signing is synchronous and stateless beyond the immutable key material,
//! so concurrent calls against the same wallet need no locking.

pub mod canonical;
pub mod envelope;

use thiserror::Error;

pub use canonical::{canonical_json, canonicalize, SerializationError};
pub use envelope::{
    sign_with_agent, sign_with_secp, verify_envelope, PubKey, SignatureObject, SignedEnvelope,
};

/// Errors from the signing pipeline.
#[derive(Debug, Error)]
pub enum SigningError {
    /// The payload could not be canonicalized.
    #[error(transparent)]
    Serialization(#[from] SerializationError),

    /// A signing operation was requested but the named signer role is not
    /// available (e.g. a client constructed without a wallet).
    #[error("no signer with role '{0}' is available")]
    UnknownSigner(String),

    /// A signature object carried undecodable or wrongly sized material.
    #[error("malformed signature object: {0}")]
    MalformedSignature(String),
}
