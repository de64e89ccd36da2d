//! Hybrid-search client.

use async_trait::async_trait;
use reqwest::Method;
use reqwest::multipart::{Form, Part};
use serde_json::json;
use std::sync::Arc;

use fyndd_core::product::{NormalizedProduct, normalize_product_list};
use fyndd_core::search::{ImageBlob, ProductSearchService, SearchMode, SearchQuery};
use fyndd_core::{FynddError, Result};

use super::api_client::{Access, ApiClient};

pub const HYBRID_SEARCH_PATH: &str = "/api/products/hybrid-search";

/// [`ProductSearchService`] over `POST /api/products/hybrid-search`.
#[derive(Clone)]
pub struct HttpProductSearch {
    api: Arc<ApiClient>,
}

impl HttpProductSearch {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    async fn execute(&self, query: &SearchQuery) -> Result<Vec<NormalizedProduct>> {
        let builder = self.api.request(Method::POST, HYBRID_SEARCH_PATH);
        let builder = match query {
            SearchQuery::Text(text) => builder.json(&text_body(text)),
            SearchQuery::Image(blob) => builder.multipart(image_form(blob)?),
        };
        let response = self.api.send(builder, Access::Public).await?;
        Ok(normalize_product_list(&response))
    }
}

#[async_trait]
impl ProductSearchService for HttpProductSearch {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<NormalizedProduct>> {
        let results = self
            .execute(query)
            .await
            .map_err(FynddError::into_search_failure)?;
        tracing::debug!(
            "[Search] {} search returned {} products",
            query.mode().as_str(),
            results.len()
        );
        Ok(results)
    }
}

fn text_body(text: &str) -> serde_json::Value {
    json!({ "query": text, "type": SearchMode::Text.as_str() })
}

fn image_form(blob: &ImageBlob) -> Result<Form> {
    let part = Part::bytes(blob.bytes.clone())
        .file_name(blob.file_name.clone())
        .mime_str(&blob.mime_type)
        .map_err(|e| FynddError::InvalidImage(format!("Unsupported image type: {}", e)))?;
    Ok(Form::new()
        .text("type", SearchMode::Image.as_str())
        .part("image", part))
}
