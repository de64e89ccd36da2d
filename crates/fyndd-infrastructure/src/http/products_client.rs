//! Product catalogue client.

use async_trait::async_trait;
use reqwest::Method;
use std::sync::Arc;

use fyndd_core::Result;
use fyndd_core::product::{
    NormalizedProduct, ProductCatalog, ProductId, normalize_product_detail, normalize_product_list,
};

use super::api_client::{Access, ApiClient, not_found_as};

/// [`ProductCatalog`] over `/api/products`.
#[derive(Clone)]
pub struct HttpProductCatalog {
    api: Arc<ApiClient>,
}

impl HttpProductCatalog {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl ProductCatalog for HttpProductCatalog {
    async fn products_by_type(&self, product_type: &str) -> Result<Vec<NormalizedProduct>> {
        let builder = self
            .api
            .request_segments(Method::GET, &["api", "products", "type", product_type.trim()])?;
        let response = self
            .api
            .send(builder, Access::Public)
            .await?;
        Ok(normalize_product_list(&response))
    }

    async fn product_detail(&self, id: &ProductId) -> Result<NormalizedProduct> {
        let builder = self
            .api
            .request_segments(Method::GET, &["api", "products", id.as_str()])?;
        let response = self
            .api
            .send(builder, Access::Public)
            .await
            .map_err(|e| not_found_as(e, "product", id.as_str()))?;
        let mut product = normalize_product_detail(&response);
        // Some detail payloads omit the id that was used to fetch them.
        if product.id.is_none() {
            product.id = Some(id.clone());
        }
        Ok(product)
    }
}
