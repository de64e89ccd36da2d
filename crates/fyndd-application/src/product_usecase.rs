//! Product browsing and detail use case.

use std::sync::Arc;

use fyndd_core::product::{NormalizedProduct, ProductCatalog, ProductId};
use fyndd_core::{FynddError, Result};

use crate::view::{Loaded, ViewTracker};

/// The single way out offered by a failed detail view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryAction {
    Retry,
    NavigateBack,
    Login,
}

impl RecoveryAction {
    /// Picks the recovery that makes sense for a load failure.
    pub fn for_error(err: &FynddError) -> Self {
        match err {
            FynddError::NotAuthenticated => RecoveryAction::Login,
            FynddError::NotFound { .. } | FynddError::ProductUnusable => {
                RecoveryAction::NavigateBack
            }
            _ => RecoveryAction::Retry,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RecoveryAction::Retry => "Try again",
            RecoveryAction::NavigateBack => "Go back",
            RecoveryAction::Login => "Log in",
        }
    }
}

/// What the product detail view should render.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewOutcome {
    Ready(NormalizedProduct),
    Failed {
        message: String,
        recovery: RecoveryAction,
    },
}

pub struct ProductUseCase {
    catalog: Arc<dyn ProductCatalog>,
    detail_view: ViewTracker,
}

impl ProductUseCase {
    pub fn new(catalog: Arc<dyn ProductCatalog>) -> Self {
        Self {
            catalog,
            detail_view: ViewTracker::new(),
        }
    }

    pub async fn products_by_type(&self, product_type: &str) -> Result<Vec<NormalizedProduct>> {
        let product_type = product_type.trim();
        if product_type.is_empty() {
            return Err(FynddError::validation("type", "Please choose a product type."));
        }
        self.catalog.products_by_type(product_type).await
    }

    /// Loads a product for the detail view. Never fails: errors become a
    /// failure view with one recovery action.
    pub async fn load_detail(&self, id: &ProductId) -> Loaded<ViewOutcome> {
        let ticket = self.detail_view.begin();
        let result = self.catalog.product_detail(id).await;
        if !self.detail_view.is_current(ticket) {
            tracing::debug!("[Products] Dropping superseded detail load for {}", id);
            return Loaded::Stale;
        }

        Loaded::Applied(match result {
            Ok(product) => ViewOutcome::Ready(product),
            Err(e) => {
                tracing::warn!("[Products] Failed to load product {}: {}", id, e);
                ViewOutcome::Failed {
                    message: e.user_message(),
                    recovery: RecoveryAction::for_error(&e),
                }
            }
        })
    }

    pub fn leave_detail(&self) {
        self.detail_view.invalidate();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct FixedCatalog(Result<NormalizedProduct>);

    #[async_trait]
    impl ProductCatalog for FixedCatalog {
        async fn products_by_type(&self, _product_type: &str) -> Result<Vec<NormalizedProduct>> {
            Ok(vec![])
        }

        async fn product_detail(&self, _id: &ProductId) -> Result<NormalizedProduct> {
            self.0.clone()
        }
    }

    #[test]
    fn test_recovery_per_error() {
        assert_eq!(
            RecoveryAction::for_error(&FynddError::NotAuthenticated),
            RecoveryAction::Login
        );
        assert_eq!(
            RecoveryAction::for_error(&FynddError::not_found("product", "7")),
            RecoveryAction::NavigateBack
        );
        assert_eq!(
            RecoveryAction::for_error(&FynddError::transport("reset")),
            RecoveryAction::Retry
        );
    }

    #[tokio::test]
    async fn test_missing_product_offers_back() {
        let usecase = ProductUseCase::new(Arc::new(FixedCatalog(Err(FynddError::not_found(
            "product", "7",
        )))));
        let outcome = usecase.load_detail(&ProductId::from("7")).await.applied().unwrap();
        assert_eq!(
            outcome,
            ViewOutcome::Failed {
                message: "The product no longer exists.".to_string(),
                recovery: RecoveryAction::NavigateBack,
            }
        );
    }

    #[tokio::test]
    async fn test_blank_type_rejected() {
        let usecase = ProductUseCase::new(Arc::new(FixedCatalog(Ok(NormalizedProduct::default()))));
        assert!(usecase.products_by_type("  ").await.unwrap_err().is_validation());
    }
}
