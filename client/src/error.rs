//! # SDK Error Taxonomy
//!
//! Every fallible operation surfaces one of the module-level error enums;
//! [`Error`] is the umbrella the client methods return so callers can `?`
//! across subsystem boundaries without a conversion zoo.
//!
//! Propagation policy: errors reach the caller unwrapped. No retries, no
//! local recovery — the single deliberate exception is the cell-node
//! endpoint fallback in [`crate::client`], which substitutes the default
//! endpoint *and* logs a warning instead of failing.

use thiserror::Error;

use crate::client::transport::TransportError;
use crate::keys::mnemonic::MnemonicError;
use crate::keys::secp::KeyError;
use crate::rpc::RpcError;
use crate::signing::{SerializationError, SigningError};
use crate::wallet::{StoreError, WalletError};

/// Umbrella error for client operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed or failed-checksum mnemonic phrase.
    #[error(transparent)]
    Mnemonic(#[from] MnemonicError),

    /// Transaction key derivation or address encoding failure.
    #[error(transparent)]
    Key(#[from] KeyError),

    /// Wallet construction, serialization, or persistence failure.
    #[error(transparent)]
    Wallet(#[from] WalletError),

    /// Payload canonicalization failure.
    #[error(transparent)]
    Serialization(#[from] SerializationError),

    /// Signing pipeline failure, including a missing signer role.
    #[error(transparent)]
    Signing(#[from] SigningError),

    /// Wallet store failure.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Network or HTTP failure, passed through opaquely.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The remote service answered with an explicit error body.
    #[error(transparent)]
    Rpc(#[from] RpcError),

    /// The remote answered 2xx but the body lacked an expected member.
    #[error("unexpected response shape: {0}")]
    UnexpectedResponse(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversions_compose() {
        fn signing() -> Result<(), Error> {
            Err(SigningError::UnknownSigner("agent".into()))?
        }
        fn mnemonic() -> Result<(), Error> {
            Err(MnemonicError::UnsupportedWordCount(13))?
        }

        assert!(matches!(signing(), Err(Error::Signing(_))));
        assert!(matches!(mnemonic(), Err(Error::Mnemonic(_))));
    }

    #[test]
    fn messages_are_useful() {
        let err = Error::from(SigningError::UnknownSigner("agent".into()));
        assert!(err.to_string().contains("agent"));

        let err = Error::UnexpectedResponse("missing node_info".into());
        assert!(err.to_string().contains("missing node_info"));
    }
}
