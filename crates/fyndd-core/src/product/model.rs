//! Product domain models.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{FynddError, Result};

/// Backend identifier of a product.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProductId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ProductId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Canonical product record assembled from an arbitrarily-shaped payload.
///
/// Every display field always holds a value; only `id` may be absent, in
/// which case the product can be rendered but not put into a cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedProduct {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ProductId>,
    pub title: String,
    pub description: String,
    pub image_url: String,
    pub images: Vec<String>,
    pub price: f64,
    pub original_price: f64,
    /// Discount in percent.
    pub discount: f64,
    pub brand: String,
    pub category: String,
    pub rating: f64,
    pub review_count: u64,
    pub in_stock: bool,
}

impl NormalizedProduct {
    /// Whether the product carries an id and can take part in cart operations.
    pub fn is_usable(&self) -> bool {
        self.id.is_some()
    }

    /// Returns the id, or `ProductUnusable` when none could be resolved.
    pub fn require_id(&self) -> Result<&ProductId> {
        self.id.as_ref().ok_or(FynddError::ProductUnusable)
    }
}

impl Default for NormalizedProduct {
    fn default() -> Self {
        Self {
            id: None,
            title: String::new(),
            description: String::new(),
            image_url: String::new(),
            images: Vec::new(),
            price: 0.0,
            original_price: 0.0,
            discount: 0.0,
            brand: String::new(),
            category: String::new(),
            rating: 0.0,
            review_count: 0,
            in_stock: true,
        }
    }
}
