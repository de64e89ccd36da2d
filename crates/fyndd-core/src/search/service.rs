//! Search service trait definition.

use async_trait::async_trait;

use crate::error::Result;
use crate::product::NormalizedProduct;
use crate::search::SearchQuery;

/// Transport-level access to the hybrid-search endpoint.
#[async_trait]
pub trait ProductSearchService: Send + Sync {
    /// Executes an already-validated query.
    ///
    /// Implementations unwrap and normalise the response; a malformed body
    /// yields an empty list. Transport or HTTP failures are returned as
    /// `SearchFailed`.
    async fn search(&self, query: &SearchQuery) -> Result<Vec<NormalizedProduct>>;
}
