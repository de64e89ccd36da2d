//! Persistent wrapper around [`FriendRequestState`].
//!
//! Owns the in-memory state behind a `RwLock`, stamps transitions with an
//! injected [`Clock`] and mirrors the pending set to client state after every
//! change. Writes are serialised and always snapshot the state current at
//! write time, so the persisted keys converge with memory. Persistence is
//! best-effort: the first failed write switches the reconciler to in-memory
//! mode for the rest of the session.

use chrono::Duration;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::{Mutex, RwLock};

use fyndd_core::Result;
use fyndd_core::clock::Clock;
use fyndd_core::friend::{FriendRequestState, PendingRequests, RequestStatus, UserId};
use fyndd_core::state::{ClientStateStore, StorageKey};

pub struct FriendRequestReconciler {
    state: RwLock<FriendRequestState>,
    /// Incoming requests the user rejected that the server may still report.
    rejected: RwLock<BTreeSet<UserId>>,
    store: ClientStateStore,
    clock: Arc<dyn Clock>,
    ttl: Duration,
    degraded: AtomicBool,
    write_guard: Mutex<()>,
}

impl FriendRequestReconciler {
    /// Restores pending and rejected requests from client state, then runs
    /// one expiry pass so requests that aged out while the app was closed are
    /// already back to `None`.
    ///
    /// Unreadable entries are treated as empty.
    pub async fn load(store: ClientStateStore, clock: Arc<dyn Clock>, ttl: Duration) -> Self {
        let ids: BTreeSet<UserId> = store
            .get_lenient(StorageKey::PendingFriendRequests)
            .await
            .unwrap_or_default();
        let issued_at: BTreeMap<UserId, i64> = store
            .get_lenient(StorageKey::PendingRequestTimestamps)
            .await
            .unwrap_or_default();
        let rejected: BTreeSet<UserId> = store
            .get_lenient(StorageKey::RejectedFriendRequests)
            .await
            .unwrap_or_default();

        let state =
            FriendRequestState::from_persisted(PendingRequests { ids, issued_at }, clock.now_millis());
        tracing::debug!(
            "[FriendRequests] Restored {} pending, {} rejected",
            state.pending().ids.len(),
            rejected.len()
        );

        let reconciler = Self {
            state: RwLock::new(state),
            rejected: RwLock::new(rejected),
            store,
            clock,
            ttl,
            degraded: AtomicBool::new(false),
            write_guard: Mutex::new(()),
        };
        reconciler.run_expiry_pass().await;
        reconciler
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// `false` once a write has failed and state is kept in memory only.
    pub fn is_persistent(&self) -> bool {
        !self.degraded.load(Ordering::SeqCst)
    }

    pub async fn status_of(&self, user_id: &UserId) -> RequestStatus {
        self.state.read().await.status_of(user_id)
    }

    pub async fn pending(&self) -> PendingRequests {
        self.state.read().await.pending().clone()
    }

    /// Applies an authoritative friends list; returns ids that became friends.
    pub async fn reconcile_with_friends_list(&self, friend_ids: HashSet<UserId>) -> Vec<UserId> {
        let confirmed = self
            .state
            .write()
            .await
            .reconcile_with_friends_list(friend_ids);
        for id in &confirmed {
            tracing::info!(target: "friend_requests", "[FriendRequests] {} PENDING -> FRIEND", id);
        }
        if !confirmed.is_empty() {
            self.persist_pending().await;
        }
        confirmed
    }

    /// Removes pending requests at least `ttl` old as of `now_ms`.
    pub async fn expire_pending_requests(&self, now_ms: i64, ttl: Duration) -> Vec<UserId> {
        let expired = self
            .state
            .write()
            .await
            .expire_pending_requests(now_ms, ttl);
        for id in &expired {
            tracing::info!(target: "friend_requests", "[FriendRequests] {} PENDING -> NONE (expired)", id);
        }
        if !expired.is_empty() {
            self.persist_pending().await;
        }
        expired
    }

    /// Expiry pass using the injected clock and configured TTL.
    pub async fn run_expiry_pass(&self) -> Vec<UserId> {
        self.expire_pending_requests(self.clock.now_millis(), self.ttl)
            .await
    }

    /// Records a request the backend has accepted for delivery.
    pub async fn mark_request_sent(&self, user_id: UserId) -> bool {
        let now = self.clock.now_millis();
        let marked = self
            .state
            .write()
            .await
            .mark_request_sent(user_id.clone(), now);
        if marked {
            tracing::info!(target: "friend_requests", "[FriendRequests] {} NONE -> PENDING", user_id);
            self.persist_pending().await;
        }
        marked
    }

    pub async fn forget_friend(&self, user_id: &UserId) -> bool {
        let removed = self.state.write().await.forget_friend(user_id);
        if removed {
            tracing::info!(target: "friend_requests", "[FriendRequests] {} FRIEND -> NONE", user_id);
        }
        removed
    }

    pub async fn rejected_ids(&self) -> BTreeSet<UserId> {
        self.rejected.read().await.clone()
    }

    pub async fn record_rejected(&self, user_id: UserId) {
        if !self.rejected.write().await.insert(user_id) {
            return;
        }
        self.persist_rejected().await;
    }

    /// Drops rejected ids the server no longer reports as incoming.
    pub async fn prune_rejected(&self, still_reported: &HashSet<UserId>) {
        {
            let mut rejected = self.rejected.write().await;
            let before = rejected.len();
            rejected.retain(|id| still_reported.contains(id));
            if rejected.len() == before {
                return;
            }
        }
        self.persist_rejected().await;
    }

    async fn persist_pending(&self) {
        let _guard = self.write_guard.lock().await;
        if self.degraded.load(Ordering::SeqCst) {
            return;
        }
        let pending = self.state.read().await.pending().clone();
        let result = async {
            self.store
                .set(StorageKey::PendingFriendRequests, &pending.ids)
                .await?;
            self.store
                .set(StorageKey::PendingRequestTimestamps, &pending.issued_at)
                .await
        }
        .await;
        self.note_persist_result(result);
    }

    async fn persist_rejected(&self) {
        let _guard = self.write_guard.lock().await;
        if self.degraded.load(Ordering::SeqCst) {
            return;
        }
        let rejected = self.rejected.read().await.clone();
        let result = self
            .store
            .set(StorageKey::RejectedFriendRequests, &rejected)
            .await;
        self.note_persist_result(result);
    }

    fn note_persist_result(&self, result: Result<()>) {
        if let Err(e) = result {
            if !self.degraded.swap(true, Ordering::SeqCst) {
                tracing::warn!(
                    "[FriendRequests] Persisting request state failed, keeping it in memory for this session: {}",
                    e
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use fyndd_core::FynddError;
    use fyndd_core::clock::ManualClock;
    use fyndd_core::state::KeyValueStore;
    use fyndd_infrastructure::MemoryStore;
    use std::sync::atomic::AtomicUsize;
    use tokio::sync::Notify;

    const HOUR_MS: i64 = 60 * 60 * 1000;

    struct FailingStore {
        writes: AtomicUsize,
    }

    #[async_trait]
    impl KeyValueStore for FailingStore {
        async fn get(&self, _key: &str) -> Result<Option<String>> {
            Ok(None)
        }
        async fn set(&self, _key: &str, _value: String) -> Result<()> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            Err(FynddError::storage("quota exceeded"))
        }
        async fn remove(&self, _key: &str) -> Result<()> {
            Ok(())
        }
    }

    /// Memory store whose first write parks until `gate` is notified.
    struct GatedStore {
        inner: MemoryStore,
        first: AtomicBool,
        entered: Notify,
        gate: Notify,
    }

    #[async_trait]
    impl KeyValueStore for GatedStore {
        async fn get(&self, key: &str) -> Result<Option<String>> {
            self.inner.get(key).await
        }
        async fn set(&self, key: &str, value: String) -> Result<()> {
            if self.first.swap(false, Ordering::SeqCst) {
                self.entered.notify_one();
                self.gate.notified().await;
            }
            self.inner.set(key, value).await
        }
        async fn remove(&self, key: &str) -> Result<()> {
            self.inner.remove(key).await
        }
    }

    async fn reconciler(store: Arc<dyn KeyValueStore>, clock: Arc<ManualClock>) -> FriendRequestReconciler {
        FriendRequestReconciler::load(ClientStateStore::new(store), clock, Duration::hours(24)).await
    }

    #[tokio::test]
    async fn test_pending_survives_reload() {
        let memory: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let clock = Arc::new(ManualClock::new(5 * HOUR_MS));
        {
            let reconciler = reconciler(memory.clone(), clock.clone()).await;
            reconciler.mark_request_sent(UserId::from("u1")).await;
        }

        let restored = reconciler(memory, clock).await;
        assert_eq!(restored.status_of(&UserId::from("u1")).await, RequestStatus::Pending);
        assert_eq!(
            restored.pending().await.issued_at.get(&UserId::from("u1")),
            Some(&(5 * HOUR_MS))
        );
    }

    #[tokio::test]
    async fn test_persisted_layout() {
        let memory = Arc::new(MemoryStore::new());
        let clock = Arc::new(ManualClock::new(42));
        let reconciler = reconciler(memory.clone(), clock).await;
        reconciler.mark_request_sent(UserId::from("u1")).await;

        assert_eq!(
            memory.get("pendingFriendRequests").await.unwrap(),
            Some("[\"u1\"]".to_string())
        );
        assert_eq!(
            memory.get("pendingRequestTimestamps").await.unwrap(),
            Some("{\"u1\":42}".to_string())
        );
    }

    #[tokio::test]
    async fn test_expiry_pass_uses_clock() {
        let memory: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let clock = Arc::new(ManualClock::new(0));
        let reconciler = reconciler(memory, clock.clone()).await;
        reconciler.mark_request_sent(UserId::from("u2")).await;

        clock.advance(23 * HOUR_MS);
        assert!(reconciler.run_expiry_pass().await.is_empty());

        clock.advance(2 * HOUR_MS);
        assert_eq!(reconciler.run_expiry_pass().await, vec![UserId::from("u2")]);
        assert_eq!(reconciler.status_of(&UserId::from("u2")).await, RequestStatus::None);
    }

    #[tokio::test]
    async fn test_load_expires_requests_that_aged_out() {
        let memory: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let clock = Arc::new(ManualClock::new(0));
        {
            let reconciler = reconciler(memory.clone(), clock.clone()).await;
            reconciler.mark_request_sent(UserId::from("u2")).await;
            reconciler.mark_request_sent(UserId::from("u3")).await;
        }

        clock.advance(25 * HOUR_MS);
        let restored = reconciler(memory.clone(), clock).await;
        assert_eq!(restored.status_of(&UserId::from("u2")).await, RequestStatus::None);
        assert!(restored.pending().await.ids.is_empty());
        assert_eq!(
            memory.get("pendingFriendRequests").await.unwrap(),
            Some("[]".to_string())
        );
    }

    #[tokio::test]
    async fn test_load_keeps_fresh_requests() {
        let memory: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let clock = Arc::new(ManualClock::new(0));
        reconciler(memory.clone(), clock.clone())
            .await
            .mark_request_sent(UserId::from("u2"))
            .await;

        clock.advance(23 * HOUR_MS);
        let restored = reconciler(memory, clock).await;
        assert_eq!(restored.status_of(&UserId::from("u2")).await, RequestStatus::Pending);
    }

    #[tokio::test]
    async fn test_overlapping_writes_persist_latest_state() {
        let store = Arc::new(GatedStore {
            inner: MemoryStore::new(),
            first: AtomicBool::new(true),
            entered: Notify::new(),
            gate: Notify::new(),
        });
        let clock = Arc::new(ManualClock::new(0));
        let reconciler = Arc::new(reconciler(store.clone(), clock.clone()).await);

        let first = tokio::spawn({
            let reconciler = reconciler.clone();
            async move { reconciler.mark_request_sent(UserId::from("a")).await }
        });
        store.entered.notified().await;

        let second = tokio::spawn({
            let reconciler = reconciler.clone();
            async move { reconciler.mark_request_sent(UserId::from("b")).await }
        });
        while reconciler.status_of(&UserId::from("b")).await != RequestStatus::Pending {
            tokio::task::yield_now().await;
        }
        store.gate.notify_one();
        assert!(first.await.unwrap());
        assert!(second.await.unwrap());

        assert_eq!(
            store.inner.get("pendingFriendRequests").await.unwrap(),
            Some("[\"a\",\"b\"]".to_string())
        );
        let restored = FriendRequestReconciler::load(
            ClientStateStore::new(store.clone()),
            clock,
            Duration::hours(24),
        )
        .await;
        assert_eq!(restored.status_of(&UserId::from("b")).await, RequestStatus::Pending);
    }

    #[tokio::test]
    async fn test_write_failure_degrades_to_memory_once() {
        let failing = Arc::new(FailingStore {
            writes: AtomicUsize::new(0),
        });
        let clock = Arc::new(ManualClock::new(0));
        let reconciler = reconciler(failing.clone(), clock).await;

        reconciler.mark_request_sent(UserId::from("a")).await;
        reconciler.mark_request_sent(UserId::from("b")).await;

        assert!(!reconciler.is_persistent());
        assert_eq!(failing.writes.load(Ordering::SeqCst), 1);
        assert_eq!(reconciler.status_of(&UserId::from("b")).await, RequestStatus::Pending);
    }

    #[tokio::test]
    async fn test_rejected_set_prunes() {
        let memory: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let reconciler = reconciler(memory, Arc::new(ManualClock::new(0))).await;
        reconciler.record_rejected(UserId::from("x")).await;
        reconciler.record_rejected(UserId::from("y")).await;

        let reported: HashSet<UserId> = [UserId::from("y")].into_iter().collect();
        reconciler.prune_rejected(&reported).await;

        let rejected = reconciler.rejected_ids().await;
        assert_eq!(rejected.into_iter().collect::<Vec<_>>(), vec![UserId::from("y")]);
    }
}
