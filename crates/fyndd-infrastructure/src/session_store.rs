//! [`SessionStore`] backed by the client state store.

use async_trait::async_trait;

use fyndd_core::Result;
use fyndd_core::auth::{AuthSession, RedirectIntent, SessionStore};
use fyndd_core::friend::UserSummary;
use fyndd_core::state::{ClientStateStore, StorageKey};

/// Keeps the bearer token, cached user and login redirect in client state.
#[derive(Clone)]
pub struct StoredSessionStore {
    state: ClientStateStore,
}

impl StoredSessionStore {
    pub fn new(state: ClientStateStore) -> Self {
        Self { state }
    }

    /// Reads a token stored either JSON-encoded or as a bare string.
    async fn read_token(&self, key: StorageKey) -> Option<String> {
        let raw = match self.state.get_raw(key).await {
            Ok(raw) => raw?,
            Err(e) => {
                tracing::warn!("[Session] Failed to read '{}': {}", key.as_str(), e);
                return None;
            }
        };
        let token = serde_json::from_str::<String>(&raw).unwrap_or(raw);
        let token = token.trim();
        (!token.is_empty()).then(|| token.to_string())
    }
}

#[async_trait]
impl SessionStore for StoredSessionStore {
    async fn token(&self) -> Option<String> {
        for key in StorageKey::token_keys() {
            if let Some(token) = self.read_token(key).await {
                return Some(token);
            }
        }
        None
    }

    async fn save_session(&self, session: &AuthSession) -> Result<()> {
        self.state.set(StorageKey::AuthToken, &session.token).await?;
        match &session.user {
            Some(user) => self.state.set(StorageKey::User, user).await?,
            None => self.state.clear(StorageKey::User).await?,
        }
        tracing::info!("[Session] Session saved");
        Ok(())
    }

    async fn cached_user(&self) -> Option<UserSummary> {
        self.state.get_lenient(StorageKey::User).await
    }

    async fn clear_session(&self) -> Result<()> {
        for key in StorageKey::token_keys() {
            self.state.clear(key).await?;
        }
        self.state.clear(StorageKey::User).await?;
        tracing::info!("[Session] Session cleared");
        Ok(())
    }

    async fn save_redirect(&self, intent: &RedirectIntent) -> Result<()> {
        self.state.set(StorageKey::RedirectAfterLogin, intent).await
    }

    async fn take_redirect(&self) -> Option<RedirectIntent> {
        let intent = self
            .state
            .get_lenient(StorageKey::RedirectAfterLogin)
            .await;
        if let Err(e) = self.state.clear(StorageKey::RedirectAfterLogin).await {
            tracing::warn!("[Session] Failed to clear login redirect: {}", e);
        }
        intent
    }
}
