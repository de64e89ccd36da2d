//! Friend domain module.
//!
//! # Module Structure
//!
//! - `model`: user ids, user summaries and request status
//! - `state`: the client-local request state machine
//! - `service`: friends API trait

mod model;
mod service;
mod state;

pub use model::{RequestStatus, UserId, UserSummary, users_from_response};
pub use service::FriendsApi;
pub use state::{
    DEFAULT_PENDING_REQUEST_TTL_HOURS, FriendRequestState, PendingRequests,
    default_pending_request_ttl,
};
