//! Friends use case.
//!
//! Wraps the friends API with the client-local request state: sent requests
//! are tracked as pending until the friends list confirms them or they
//! expire, and rejected incoming requests stay hidden until the server stops
//! reporting them.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use fyndd_core::friend::{FriendsApi, RequestStatus, UserId, UserSummary};
use fyndd_core::{FynddError, Result};

use crate::friend_request_reconciler::FriendRequestReconciler;

/// A user search hit annotated with what the UI may do next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserSearchResult {
    pub user: UserSummary,
    pub status: RequestStatus,
}

pub struct FriendsUseCase {
    api: Arc<dyn FriendsApi>,
    reconciler: Arc<FriendRequestReconciler>,
}

impl FriendsUseCase {
    pub fn new(api: Arc<dyn FriendsApi>, reconciler: Arc<FriendRequestReconciler>) -> Self {
        Self { api, reconciler }
    }

    pub fn reconciler(&self) -> &Arc<FriendRequestReconciler> {
        &self.reconciler
    }

    /// Fetches the authoritative friends list and reconciles pending requests
    /// against it. A failed fetch leaves local state untouched.
    pub async fn refresh_friends(&self) -> Result<Vec<UserSummary>> {
        let friends = self.api.list_friends().await?;
        let ids: HashSet<UserId> = friends.iter().map(|friend| friend.id.clone()).collect();
        self.reconciler.reconcile_with_friends_list(ids).await;
        Ok(friends)
    }

    pub async fn status_of(&self, user_id: &UserId) -> RequestStatus {
        self.reconciler.status_of(user_id).await
    }

    /// Sends a friend request and records it as pending once the backend
    /// accepted it.
    pub async fn send_request(&self, user_id: &UserId) -> Result<()> {
        match self.reconciler.status_of(user_id).await {
            RequestStatus::Friend => {
                return Err(FynddError::conflict("You are already friends."));
            }
            RequestStatus::Pending => {
                return Err(FynddError::conflict("Friend request already sent."));
            }
            RequestStatus::None => {}
        }

        self.api.send_request(user_id).await?;
        self.reconciler.mark_request_sent(user_id.clone()).await;
        Ok(())
    }

    pub async fn accept_request(&self, user_id: &UserId) -> Result<()> {
        self.api.accept_request(user_id).await?;
        tracing::info!("[Friends] Accepted request from {}", user_id);
        self.refresh_quietly().await;
        Ok(())
    }

    pub async fn reject_request(&self, user_id: &UserId) -> Result<()> {
        self.api.reject_request(user_id).await?;
        self.reconciler.record_rejected(user_id.clone()).await;
        tracing::info!("[Friends] Rejected request from {}", user_id);
        Ok(())
    }

    /// Unfriends `user_id`. A 404 means the friendship is already gone.
    pub async fn remove_friend(&self, user_id: &UserId) -> Result<()> {
        match self.api.remove_friend(user_id).await {
            Ok(()) => {}
            Err(e) if e.is_not_found() => {
                tracing::info!("[Friends] {} was already removed", user_id);
            }
            Err(e) => return Err(e),
        }
        self.reconciler.forget_friend(user_id).await;
        self.refresh_quietly().await;
        Ok(())
    }

    /// Incoming requests, minus those the user already rejected.
    pub async fn incoming_requests(&self) -> Result<Vec<UserSummary>> {
        let requests = self.api.incoming_requests().await?;
        let reported: HashSet<UserId> = requests.iter().map(|user| user.id.clone()).collect();
        self.reconciler.prune_rejected(&reported).await;

        let rejected = self.reconciler.rejected_ids().await;
        Ok(requests
            .into_iter()
            .filter(|user| !rejected.contains(&user.id))
            .collect())
    }

    pub async fn search_users(&self, query: &str) -> Result<Vec<UserSearchResult>> {
        let query = query.trim();
        if query.is_empty() {
            return Err(FynddError::EmptyQuery);
        }
        let users = self.api.search_users(query).await?;
        let mut results = Vec::with_capacity(users.len());
        for user in users {
            let status = self.reconciler.status_of(&user.id).await;
            results.push(UserSearchResult { user, status });
        }
        Ok(results)
    }

    /// Runs the expiry pass now and then every `every` until `cancel` fires.
    pub fn start_expiry_scheduler(
        self: &Arc<Self>,
        every: Duration,
        cancel: CancellationToken,
    ) -> JoinHandle<()> {
        let reconciler = Arc::clone(&self.reconciler);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            tracing::info!(target: "friend_requests", "Expiry scheduler started ({:?} interval)", every);

            loop {
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    _ = ticker.tick() => {
                        let expired = reconciler.run_expiry_pass().await;
                        tracing::debug!(target: "friend_requests", "Expiry tick removed {} requests", expired.len());
                    }
                }
            }

            tracing::info!(target: "friend_requests", "Expiry scheduler stopped");
        })
    }

    async fn refresh_quietly(&self) {
        if let Err(e) = self.refresh_friends().await {
            tracing::warn!("[Friends] Friends list refresh failed: {}", e);
        }
    }
}
