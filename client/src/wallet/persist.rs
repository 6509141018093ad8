//! # Encrypted Serialized Wallet Form
//!
//! The at-rest representation of a wallet. The container is a small JSON
//! document carrying a format tag, the KDF parameters, and the sealed
//! plaintext:
//!
//! ```json
//! {
//!   "type": "ixo-wallet/v1",
//!   "kdf": { "algo": "pbkdf2-hmac-sha256", "iterations": 600000, "salt": "<base64>" },
//!   "data": "<base64(nonce || ciphertext)>"
//! }
//! ```
//!
//! The plaintext inside the ciphertext is the mnemonic plus the DID prefix —
//! everything needed to re-derive both key pairs. KDF parameters are read
//! back from the container on decrypt, so the defaults in `config` can be
//! raised without invalidating existing wallets.

use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::config::{KDF_SALT_LENGTH, PBKDF2_ITERATIONS, WALLET_FORMAT};
use crate::crypto::encoding::{from_base64, to_base64};
use crate::crypto::encryption::{derive_key, open, seal};
use crate::wallet::WalletError;

/// KDF algorithm label recorded in the container.
const KDF_ALGO: &str = "pbkdf2-hmac-sha256";

/// The outer serialized wallet container.
#[derive(Debug, Serialize, Deserialize)]
pub struct SerializedWallet {
    /// Format tag; must equal [`WALLET_FORMAT`].
    #[serde(rename = "type")]
    pub format: String,
    /// Parameters for re-deriving the encryption key.
    pub kdf: KdfParams,
    /// Base64 of `nonce || ciphertext`.
    pub data: String,
}

/// Key-derivation parameters stored alongside the ciphertext.
#[derive(Debug, Serialize, Deserialize)]
pub struct KdfParams {
    /// KDF algorithm label.
    pub algo: String,
    /// PBKDF2 iteration count used for this wallet.
    pub iterations: u32,
    /// Base64 of the random salt.
    pub salt: String,
}

/// What actually lives inside the ciphertext.
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct WalletPlaintext {
    /// The BIP-39 phrase both key pairs derive from.
    pub mnemonic: String,
    /// DID prefix the wallet was built with.
    pub did_prefix: String,
}

/// Encrypt wallet secrets into the serialized container string.
pub(crate) fn encrypt_wallet(
    mnemonic: &str,
    did_prefix: &str,
    password: &str,
) -> Result<String, WalletError> {
    let mut salt = [0u8; KDF_SALT_LENGTH];
    rand::rngs::OsRng.fill_bytes(&mut salt);

    let key = derive_key(password, &salt, PBKDF2_ITERATIONS)?;
    let plaintext = serde_json::to_vec(&WalletPlaintext {
        mnemonic: mnemonic.to_string(),
        did_prefix: did_prefix.to_string(),
    })
    .map_err(|e| WalletError::BadSerializedForm(e.to_string()))?;
    let sealed = seal(&key, &plaintext)?;

    let container = SerializedWallet {
        format: WALLET_FORMAT.to_string(),
        kdf: KdfParams {
            algo: KDF_ALGO.to_string(),
            iterations: PBKDF2_ITERATIONS,
            salt: to_base64(&salt),
        },
        data: to_base64(&sealed),
    };

    serde_json::to_string(&container).map_err(|e| WalletError::BadSerializedForm(e.to_string()))
}

/// Decrypt a serialized container back into the wallet secrets.
pub(crate) fn decrypt_wallet(
    serialized: &str,
    password: &str,
) -> Result<WalletPlaintext, WalletError> {
    let container: SerializedWallet = serde_json::from_str(serialized)
        .map_err(|e| WalletError::BadSerializedForm(e.to_string()))?;

    if container.format != WALLET_FORMAT {
        return Err(WalletError::BadSerializedForm(format!(
            "unknown wallet format: {}",
            container.format
        )));
    }
    if container.kdf.algo != KDF_ALGO {
        return Err(WalletError::BadSerializedForm(format!(
            "unknown KDF: {}",
            container.kdf.algo
        )));
    }

    let salt = from_base64(&container.kdf.salt)
        .map_err(|e| WalletError::BadSerializedForm(e.to_string()))?;
    let sealed = from_base64(&container.data)
        .map_err(|e| WalletError::BadSerializedForm(e.to_string()))?;

    let key = derive_key(password, &salt, container.kdf.iterations)?;
    let plaintext = open(&key, &sealed)?;

    serde_json::from_slice(&plaintext).map_err(|e| WalletError::BadSerializedForm(e.to_string()))
}
