//! Friends API client.

use async_trait::async_trait;
use reqwest::Method;
use std::sync::Arc;

use fyndd_core::Result;
use fyndd_core::friend::{FriendsApi, UserId, UserSummary, users_from_response};

use super::api_client::{Access, ApiClient, not_found_as};

/// [`FriendsApi`] over `/api/friends`.
#[derive(Clone)]
pub struct HttpFriendsApi {
    api: Arc<ApiClient>,
}

impl HttpFriendsApi {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    async fn user_call(&self, method: Method, segments: &[&str], user_id: &UserId) -> Result<()> {
        self.api
            .send(self.api.request_segments(method, segments)?, Access::User)
            .await
            .map_err(|e| not_found_as(e, "user", user_id.as_str()))?;
        Ok(())
    }
}

#[async_trait]
impl FriendsApi for HttpFriendsApi {
    async fn list_friends(&self) -> Result<Vec<UserSummary>> {
        let response = self
            .api
            .send(self.api.request(Method::GET, "/api/friends"), Access::User)
            .await?;
        Ok(users_from_response(&response))
    }

    async fn search_users(&self, query: &str) -> Result<Vec<UserSummary>> {
        let builder = self
            .api
            .request(Method::GET, "/api/friends/search")
            .query(&[("query", query)]);
        let response = self.api.send(builder, Access::User).await?;
        Ok(users_from_response(&response))
    }

    async fn send_request(&self, user_id: &UserId) -> Result<()> {
        self.user_call(Method::POST, &["api", "friends", "request", user_id.as_str()], user_id)
            .await
    }

    async fn accept_request(&self, user_id: &UserId) -> Result<()> {
        self.user_call(Method::POST, &["api", "friends", "accept", user_id.as_str()], user_id)
            .await
    }

    async fn reject_request(&self, user_id: &UserId) -> Result<()> {
        self.user_call(Method::POST, &["api", "friends", "reject", user_id.as_str()], user_id)
            .await
    }

    async fn remove_friend(&self, user_id: &UserId) -> Result<()> {
        self.user_call(Method::DELETE, &["api", "friends", user_id.as_str()], user_id)
            .await
    }

    async fn incoming_requests(&self) -> Result<Vec<UserSummary>> {
        let response = self
            .api
            .send(self.api.request(Method::GET, "/api/friends/requests"), Access::User)
            .await?;
        Ok(users_from_response(&response))
    }
}
