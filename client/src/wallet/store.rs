//! # Wallet Storage Collaborator
//!
//! The SDK persists exactly one value — the encrypted serialized wallet —
//! under a single fixed key. [`WalletStore`] is the seam: callers bring
//! whatever backend they already have, the SDK ships an in-memory store for
//! tests and a `sled`-backed store for durable local persistence.

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use parking_lot::RwLock;
use thiserror::Error;

/// A storage backend failed.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("wallet store backend error: {0}")]
    Backend(String),

    /// The stored value was not valid UTF-8. Serialized wallets are JSON
    /// strings; anything else under the wallet key is corruption.
    #[error("stored wallet is not valid UTF-8")]
    NotUtf8,
}

/// Key-value persistence for the serialized wallet.
///
/// Implementations must tolerate concurrent readers; the SDK itself only
/// ever writes from explicit `persist` calls.
#[async_trait]
pub trait WalletStore: Send + Sync {
    /// Fetch the value stored under `key`, if any.
    async fn get_item(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Store `value` under `key`, replacing any previous value.
    async fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

// ---------------------------------------------------------------------------
// MemoryStore
// ---------------------------------------------------------------------------

/// Volatile in-process store. Useful for tests and short-lived sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl WalletStore for MemoryStore {
    async fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.items.read().get(key).cloned())
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.items.write().insert(key.to_string(), value.to_string());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// SledStore
// ---------------------------------------------------------------------------

/// Durable store backed by an embedded `sled` database.
///
/// The database holds only serialized (already encrypted) wallets, so the
/// file on disk never contains plaintext key material.
pub struct SledStore {
    db: sled::Db,
}

impl SledStore {
    /// Open (or create) a store at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let db = sled::open(path).map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(Self { db })
    }
}

#[async_trait]
impl WalletStore for SledStore {
    async fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        let value = self
            .db
            .get(key)
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        match value {
            Some(bytes) => {
                let s = String::from_utf8(bytes.to_vec()).map_err(|_| StoreError::NotUtf8)?;
                Ok(Some(s))
            }
            None => Ok(None),
        }
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.db
            .insert(key, value.as_bytes())
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        self.db
            .flush_async()
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(())
    }
}

impl std::fmt::Debug for SledStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SledStore").finish_non_exhaustive()
    }
}
