//! Wires infrastructure into the use cases.

use std::sync::Arc;

use fyndd_core::Result;
use fyndd_core::auth::SessionStore;
use fyndd_core::cart::Cart;
use fyndd_core::clock::{Clock, SystemClock};
use fyndd_core::config::ClientConfig;
use fyndd_core::state::{ClientStateStore, KeyValueStore};
use fyndd_infrastructure::{
    ApiClient, FynddPaths, HttpAuthApi, HttpCartApi, HttpFriendsApi, HttpProductCatalog,
    HttpProductSearch, JsonFileStore, MemoryStore, StoredSessionStore,
};

use crate::auth_usecase::{AuthUseCase, LoginOutcome};
use crate::cart_usecase::CartUseCase;
use crate::friend_request_reconciler::FriendRequestReconciler;
use crate::friends_usecase::FriendsUseCase;
use crate::product_usecase::ProductUseCase;
use crate::search_usecase::SearchUseCase;

/// Every use case of the client, sharing one session and state store.
pub struct FynddApp {
    pub config: ClientConfig,
    pub session: Arc<dyn SessionStore>,
    pub auth: AuthUseCase,
    pub cart: CartUseCase,
    pub friends: Arc<FriendsUseCase>,
    pub products: ProductUseCase,
    pub search: SearchUseCase,
}

impl FynddApp {
    /// Builds the app against the configured state file.
    ///
    /// If the state file cannot be opened the app still starts, keeping
    /// client state in memory for this run.
    pub async fn build(config: ClientConfig) -> Result<Self> {
        let path = match &config.state_file {
            Some(path) => path.clone(),
            None => FynddPaths::state_file()?,
        };
        let store: Arc<dyn KeyValueStore> = match JsonFileStore::open(&path).await {
            Ok(store) => Arc::new(store),
            Err(e) => {
                tracing::warn!(
                    "[App] State file {} unavailable, using in-memory state: {}",
                    path.display(),
                    e
                );
                Arc::new(MemoryStore::new())
            }
        };
        Ok(Self::with_store(config, store, Arc::new(SystemClock)).await)
    }

    /// Builds the app over an explicit store and clock.
    pub async fn with_store(
        config: ClientConfig,
        store: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let state = ClientStateStore::new(store);
        let session: Arc<dyn SessionStore> = Arc::new(StoredSessionStore::new(state.clone()));
        let api = Arc::new(ApiClient::new(config.api_base(), session.clone()));

        let reconciler = Arc::new(
            FriendRequestReconciler::load(state, clock, config.pending_request_ttl()).await,
        );

        Self {
            auth: AuthUseCase::new(Arc::new(HttpAuthApi::new(api.clone())), session.clone()),
            cart: CartUseCase::new(Arc::new(HttpCartApi::new(api.clone())), session.clone()),
            friends: Arc::new(FriendsUseCase::new(
                Arc::new(HttpFriendsApi::new(api.clone())),
                reconciler,
            )),
            products: ProductUseCase::new(Arc::new(HttpProductCatalog::new(api.clone()))),
            search: SearchUseCase::new(
                Arc::new(HttpProductSearch::new(api)),
                config.max_image_bytes,
                config.jpeg_quality,
            ),
            session,
            config,
        }
    }

    /// Replays the action deferred by a login redirect, if any.
    pub async fn replay_after_login(&self, outcome: &LoginOutcome) -> Option<Result<Cart>> {
        let action = outcome.redirect.as_ref()?.pending_action.as_ref()?;
        Some(self.cart.replay(action).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fyndd_core::clock::ManualClock;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_build_uses_configured_state_file() {
        let temp_dir = TempDir::new().unwrap();
        let config = ClientConfig {
            state_file: Some(temp_dir.path().join("state.json")),
            ..Default::default()
        };
        let app = FynddApp::build(config).await.unwrap();
        assert!(app.session.token().await.is_none());
        assert!(app.friends.reconciler().is_persistent());
    }

    #[tokio::test]
    async fn test_corrupt_state_file_falls_back_to_memory() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("state.json");
        std::fs::write(&path, "{oops").unwrap();
        let config = ClientConfig {
            state_file: Some(path.clone()),
            ..Default::default()
        };

        let app = FynddApp::build(config).await.unwrap();
        assert!(!app.auth.is_logged_in().await);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{oops");
    }

    #[tokio::test]
    async fn test_with_store_respects_ttl_config() {
        let config = ClientConfig {
            pending_request_ttl_secs: 60,
            ..Default::default()
        };
        let app = FynddApp::with_store(
            config,
            Arc::new(MemoryStore::new()),
            Arc::new(ManualClock::new(0)),
        )
        .await;
        assert_eq!(app.friends.reconciler().ttl(), chrono::Duration::seconds(60));
    }
}
