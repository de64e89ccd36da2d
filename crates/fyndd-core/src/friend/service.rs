//! Friends API trait.

use async_trait::async_trait;

use crate::error::Result;
use crate::friend::{UserId, UserSummary};

/// Backend operations of the social layer.
///
/// There is deliberately no "list sent requests" operation: the backend does
/// not offer one, which is why outgoing request state lives on the client.
#[async_trait]
pub trait FriendsApi: Send + Sync {
    /// Lists the current user's friends.
    async fn list_friends(&self) -> Result<Vec<UserSummary>>;

    /// Searches users by name or email.
    async fn search_users(&self, query: &str) -> Result<Vec<UserSummary>>;

    async fn send_request(&self, user_id: &UserId) -> Result<()>;

    async fn accept_request(&self, user_id: &UserId) -> Result<()>;

    async fn reject_request(&self, user_id: &UserId) -> Result<()>;

    async fn remove_friend(&self, user_id: &UserId) -> Result<()>;

    /// Lists requests other users have sent to the current user.
    async fn incoming_requests(&self) -> Result<Vec<UserSummary>>;
}
