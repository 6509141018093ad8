//! # Session Cache
//!
//! Explicit caching for remote lookups that are stable over a session.
//! Replaces per-call closure memoization with a cache the caller can see
//! and invalidate: entries live until [`SessionCache::invalidate_all`] (or
//! a targeted invalidate) is called, not until some closure goes away.
//!
//! Only genuinely remote, session-stable facts are cached — currently the
//! node info document (source of the chain id). Signer account facts are
//! derived locally from wallet key material and need no cache.

use parking_lot::RwLock;
use serde_json::Value;

/// Cache of session-stable remote lookups.
#[derive(Debug, Default)]
pub struct SessionCache {
    node_info: RwLock<Option<Value>>,
}

impl SessionCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// The cached node info document, if present.
    pub fn node_info(&self) -> Option<Value> {
        self.node_info.read().clone()
    }

    /// Store the node info document.
    pub fn set_node_info(&self, value: Value) {
        *self.node_info.write() = Some(value);
    }

    /// Drop the cached node info (e.g. after switching endpoints).
    pub fn invalidate_node_info(&self) {
        *self.node_info.write() = None;
    }

    /// Drop every cached entry.
    pub fn invalidate_all(&self) {
        self.invalidate_node_info();
    }
}
