//! Product catalogue service trait.

use async_trait::async_trait;

use crate::error::Result;
use crate::product::{NormalizedProduct, ProductId};

/// Read access to the backend product catalogue.
#[async_trait]
pub trait ProductCatalog: Send + Sync {
    /// Lists products of one type (e.g. "dresses").
    async fn products_by_type(&self, product_type: &str) -> Result<Vec<NormalizedProduct>>;

    /// Fetches a single product.
    async fn product_detail(&self, id: &ProductId) -> Result<NormalizedProduct>;
}
