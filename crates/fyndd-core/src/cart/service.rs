//! Cart API trait.

use async_trait::async_trait;

use crate::cart::{Cart, FriendCart};
use crate::error::Result;
use crate::product::ProductId;

/// Backend cart operations for the authenticated user.
#[async_trait]
pub trait CartApi: Send + Sync {
    async fn fetch_cart(&self) -> Result<Cart>;

    async fn add_item(&self, product_id: &ProductId, quantity: u32) -> Result<()>;

    /// Fails with `NotFound` when the item is not in the cart.
    async fn remove_item(&self, product_id: &ProductId) -> Result<()>;

    /// Fails with `NotFound` when there is no cart to clear.
    async fn clear_cart(&self) -> Result<()>;

    async fn friends_carts(&self) -> Result<Vec<FriendCart>>;
}
