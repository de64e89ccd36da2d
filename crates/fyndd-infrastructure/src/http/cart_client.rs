//! Cart API client.

use async_trait::async_trait;
use reqwest::Method;
use serde_json::json;
use std::sync::Arc;

use fyndd_core::Result;
use fyndd_core::cart::{Cart, CartApi, FriendCart};
use fyndd_core::product::ProductId;

use super::api_client::{Access, ApiClient, not_found_as};

/// [`CartApi`] over `/cart`.
#[derive(Clone)]
pub struct HttpCartApi {
    api: Arc<ApiClient>,
}

impl HttpCartApi {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl CartApi for HttpCartApi {
    async fn fetch_cart(&self) -> Result<Cart> {
        let response = self
            .api
            .send(self.api.request(Method::GET, "/cart"), Access::User)
            .await?;
        Ok(Cart::from_response(&response))
    }

    async fn add_item(&self, product_id: &ProductId, quantity: u32) -> Result<()> {
        let builder = self
            .api
            .request(Method::POST, "/cart")
            .json(&json!({ "productId": product_id, "quantity": quantity }));
        self.api
            .send(builder, Access::User)
            .await
            .map_err(|e| not_found_as(e, "product", product_id.as_str()))?;
        Ok(())
    }

    async fn remove_item(&self, product_id: &ProductId) -> Result<()> {
        let builder = self
            .api
            .request_segments(Method::DELETE, &["cart", "remove", product_id.as_str()])?;
        self.api
            .send(builder, Access::User)
            .await
            .map_err(|e| not_found_as(e, "cart item", product_id.as_str()))?;
        Ok(())
    }

    async fn clear_cart(&self) -> Result<()> {
        self.api
            .send(self.api.request(Method::DELETE, "/cart/clear"), Access::User)
            .await
            .map_err(|e| not_found_as(e, "cart", "current"))?;
        Ok(())
    }

    async fn friends_carts(&self) -> Result<Vec<FriendCart>> {
        let response = self
            .api
            .send(self.api.request(Method::GET, "/cart/friends"), Access::User)
            .await?;
        Ok(FriendCart::list_from_response(&response))
    }
}
