//! Client-local friend-request state machine.
//!
//! The backend exposes no "requests I have sent" endpoint, so the client keeps
//! its own record of outgoing requests and reconciles it against the
//! authoritative friends list:
//!
//! ```text
//!            mark_request_sent            friends list contains id
//!   None ─────────────────────▶ Pending ─────────────────────────▶ Friend
//!    ▲                            │
//!    └────── expiry (now - issued_at ≥ ttl) ────────────────────────┘
//! ```
//!
//! `Friend` is never stored locally; it is whatever the last friends-list
//! fetch said. All operations are set unions/differences, so interval-driven
//! and user-driven passes commute.

use chrono::Duration;
use std::collections::{BTreeMap, BTreeSet, HashSet};

use super::model::{RequestStatus, UserId};

/// Hours after which an unconfirmed request is treated as rejected.
pub const DEFAULT_PENDING_REQUEST_TTL_HOURS: i64 = 24;

/// Default time after which an unconfirmed request is treated as rejected.
pub fn default_pending_request_ttl() -> Duration {
    Duration::hours(DEFAULT_PENDING_REQUEST_TTL_HOURS)
}

/// Persisted slice of [`FriendRequestState`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingRequests {
    pub ids: BTreeSet<UserId>,
    /// Epoch milliseconds at which each request was confirmed sent.
    pub issued_at: BTreeMap<UserId, i64>,
}

/// Friend-request state as seen by this client.
#[derive(Debug, Clone, Default)]
pub struct FriendRequestState {
    friend_ids: HashSet<UserId>,
    pending: PendingRequests,
}

impl FriendRequestState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restores the persisted pending set.
    ///
    /// Ids without a timestamp are stamped with `now_ms` so they can still
    /// expire; timestamps without a pending id are dropped.
    pub fn from_persisted(pending: PendingRequests, now_ms: i64) -> Self {
        let PendingRequests { ids, mut issued_at } = pending;
        issued_at.retain(|id, _| ids.contains(id));
        for id in &ids {
            issued_at.entry(id.clone()).or_insert(now_ms);
        }
        Self {
            friend_ids: HashSet::new(),
            pending: PendingRequests { ids, issued_at },
        }
    }

    pub fn pending(&self) -> &PendingRequests {
        &self.pending
    }

    pub fn friend_ids(&self) -> &HashSet<UserId> {
        &self.friend_ids
    }

    /// Replaces the authoritative friend set and drops pending entries that
    /// it now confirms. Returns the ids that moved from pending to friend.
    pub fn reconcile_with_friends_list(
        &mut self,
        current_friend_ids: HashSet<UserId>,
    ) -> Vec<UserId> {
        let confirmed: Vec<UserId> = self
            .pending
            .ids
            .iter()
            .filter(|id| current_friend_ids.contains(*id))
            .cloned()
            .collect();
        for id in &confirmed {
            self.remove_pending(id);
        }
        self.friend_ids = current_friend_ids;
        confirmed
    }

    /// Removes every pending request whose age has reached `ttl`.
    /// Returns the expired ids.
    pub fn expire_pending_requests(&mut self, now_ms: i64, ttl: Duration) -> Vec<UserId> {
        let ttl_ms = ttl.num_milliseconds();
        let expired: Vec<UserId> = self
            .pending
            .issued_at
            .iter()
            .filter(|(_, issued)| now_ms.saturating_sub(**issued) >= ttl_ms)
            .map(|(id, _)| id.clone())
            .collect();
        for id in &expired {
            self.remove_pending(id);
        }
        expired
    }

    /// Records a request the backend has confirmed as sent.
    ///
    /// Re-sending refreshes the timestamp. A user who is already a friend is
    /// left alone so pending and friend sets stay disjoint.
    pub fn mark_request_sent(&mut self, user_id: UserId, now_ms: i64) -> bool {
        if self.friend_ids.contains(&user_id) {
            return false;
        }
        self.pending.issued_at.insert(user_id.clone(), now_ms);
        self.pending.ids.insert(user_id);
        true
    }

    /// Forgets the friend locally (after an unfriend call succeeded).
    pub fn forget_friend(&mut self, user_id: &UserId) -> bool {
        self.friend_ids.remove(user_id)
    }

    pub fn status_of(&self, user_id: &UserId) -> RequestStatus {
        if self.friend_ids.contains(user_id) {
            RequestStatus::Friend
        } else if self.pending.ids.contains(user_id) {
            RequestStatus::Pending
        } else {
            RequestStatus::None
        }
    }

    fn remove_pending(&mut self, id: &UserId) {
        self.pending.ids.remove(id);
        self.pending.issued_at.remove(id);
    }
}
