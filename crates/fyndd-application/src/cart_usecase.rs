//! Cart use case.
//!
//! Removal and clearing treat a 404 as the desired end state. Every mutation
//! is followed by a refetch so totals always come from the server's view.

use std::sync::Arc;
use tokio::sync::RwLock;

use fyndd_core::auth::{PendingAction, RedirectIntent, SessionStore};
use fyndd_core::cart::{Cart, CartApi, FriendCart};
use fyndd_core::product::{NormalizedProduct, ProductId};
use fyndd_core::{FynddError, Result};

pub struct CartUseCase {
    api: Arc<dyn CartApi>,
    session: Arc<dyn SessionStore>,
    cart: RwLock<Cart>,
}

impl CartUseCase {
    pub fn new(api: Arc<dyn CartApi>, session: Arc<dyn SessionStore>) -> Self {
        Self {
            api,
            session,
            cart: RwLock::new(Cart::default()),
        }
    }

    pub async fn fetch(&self) -> Result<Cart> {
        let cart = self.api.fetch_cart().await?;
        *self.cart.write().await = cart.clone();
        Ok(cart)
    }

    /// Adds `product` to the cart.
    ///
    /// When the user is not logged in, the add is stored as a pending action
    /// for `from_path` and `NotAuthenticated` is returned; it is replayed
    /// after login via [`CartUseCase::replay`].
    pub async fn add_product(
        &self,
        product: &NormalizedProduct,
        quantity: u32,
        from_path: &str,
    ) -> Result<Cart> {
        let product_id = product.require_id()?.clone();
        if quantity == 0 {
            return Err(FynddError::validation("quantity", "Quantity must be at least 1."));
        }

        if self.session.token().await.is_none() {
            self.defer_add(from_path, &product_id, quantity).await;
            return Err(FynddError::NotAuthenticated);
        }

        match self.api.add_item(&product_id, quantity).await {
            Ok(()) => {}
            Err(FynddError::NotAuthenticated) => {
                self.defer_add(from_path, &product_id, quantity).await;
                return Err(FynddError::NotAuthenticated);
            }
            Err(e) => return Err(e),
        }
        tracing::info!("[Cart] Added {} x{}", product_id, quantity);
        self.fetch().await
    }

    /// Removes a line. A 404 means it is already gone, which counts as success.
    pub async fn remove(&self, product_id: &ProductId) -> Result<Cart> {
        match self.api.remove_item(product_id).await {
            Ok(()) => tracing::info!("[Cart] Removed {}", product_id),
            Err(e) if e.is_not_found() => {
                tracing::info!("[Cart] {} was not in the cart", product_id)
            }
            Err(e) => return Err(e),
        }
        self.fetch().await
    }

    pub async fn clear(&self) -> Result<Cart> {
        match self.api.clear_cart().await {
            Ok(()) => tracing::info!("[Cart] Cleared"),
            Err(e) if e.is_not_found() => tracing::info!("[Cart] No cart to clear"),
            Err(e) => return Err(e),
        }
        self.fetch().await
    }

    pub async fn friends_carts(&self) -> Result<Vec<FriendCart>> {
        self.api.friends_carts().await
    }

    /// Subtotal of the most recently fetched cart.
    pub async fn subtotal(&self) -> f64 {
        self.cart.read().await.subtotal()
    }

    /// Replays an action deferred by a login redirect.
    pub async fn replay(&self, action: &PendingAction) -> Result<Cart> {
        match action {
            PendingAction::AddToCart {
                product_id,
                quantity,
            } => {
                self.api.add_item(product_id, (*quantity).max(1)).await?;
                tracing::info!("[Cart] Replayed deferred add of {}", product_id);
                self.fetch().await
            }
        }
    }

    async fn defer_add(&self, from_path: &str, product_id: &ProductId, quantity: u32) {
        let intent = RedirectIntent::new(from_path).with_action(PendingAction::AddToCart {
            product_id: product_id.clone(),
            quantity,
        });
        if let Err(e) = self.session.save_redirect(&intent).await {
            tracing::warn!("[Cart] Could not save deferred add: {}", e);
        }
    }
}
