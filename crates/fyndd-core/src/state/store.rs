//! Client-local key-value persistence.
//!
//! Mirrors the browser's local storage: string values under fixed keys. The
//! [`ClientStateStore`] wrapper adds typed JSON get/set/clear on top so callers
//! never touch raw strings.

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;

use crate::error::Result;

/// Fixed storage keys used by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKey {
    /// Current bearer token key.
    AuthToken,
    /// Legacy bearer token key; read for backward compatibility, never written.
    LegacyToken,
    /// Cached user object.
    User,
    PendingFriendRequests,
    PendingRequestTimestamps,
    RejectedFriendRequests,
    RedirectAfterLogin,
}

impl StorageKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageKey::AuthToken => "authToken",
            StorageKey::LegacyToken => "token",
            StorageKey::User => "user",
            StorageKey::PendingFriendRequests => "pendingFriendRequests",
            StorageKey::PendingRequestTimestamps => "pendingRequestTimestamps",
            StorageKey::RejectedFriendRequests => "rejectedFriendRequests",
            StorageKey::RedirectAfterLogin => "redirectAfterLogin",
        }
    }

    /// Keys that may hold a bearer token, in read order.
    pub fn token_keys() -> [StorageKey; 2] {
        [StorageKey::AuthToken, StorageKey::LegacyToken]
    }
}

/// Raw string storage under string keys.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;

    async fn set(&self, key: &str, value: String) -> Result<()>;

    async fn remove(&self, key: &str) -> Result<()>;
}

/// Typed, JSON-encoding view over a [`KeyValueStore`].
#[derive(Clone)]
pub struct ClientStateStore {
    inner: Arc<dyn KeyValueStore>,
}

impl ClientStateStore {
    pub fn new(inner: Arc<dyn KeyValueStore>) -> Self {
        Self { inner }
    }

    /// Reads and decodes a value.
    ///
    /// A value that is not valid JSON for `T` is reported as a serialization
    /// error; callers that can tolerate corruption treat it as absent.
    pub async fn get<T: DeserializeOwned>(&self, key: StorageKey) -> Result<Option<T>> {
        match self.inner.get(key.as_str()).await? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    /// Reads a value, treating absent or undecodable data as `None`.
    pub async fn get_lenient<T: DeserializeOwned>(&self, key: StorageKey) -> Option<T> {
        match self.get(key).await {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("[StateStore] Ignoring unreadable '{}': {}", key.as_str(), e);
                None
            }
        }
    }

    pub async fn set<T: Serialize + ?Sized>(&self, key: StorageKey, value: &T) -> Result<()> {
        let encoded = serde_json::to_string(value)?;
        self.inner.set(key.as_str(), encoded).await
    }

    pub async fn clear(&self, key: StorageKey) -> Result<()> {
        self.inner.remove(key.as_str()).await
    }

    /// Raw access for values written by older clients without JSON encoding.
    pub async fn get_raw(&self, key: StorageKey) -> Result<Option<String>> {
        self.inner.get(key.as_str()).await
    }
}
