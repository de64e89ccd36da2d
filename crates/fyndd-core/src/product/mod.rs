//! Product domain module.
//!
//! # Module Structure
//!
//! - `model`: `NormalizedProduct` and `ProductId`
//! - `resolver`: first-present-wins lookup over synonym keys
//! - `normalize`: payload normalisation and list/detail unwrapping
//! - `service`: catalogue service trait

pub mod model;
pub mod normalize;
pub mod resolver;
mod service;

pub use model::{NormalizedProduct, ProductId};
pub use normalize::{
    normalize_product, normalize_product_detail, normalize_product_list, unwrap_product_list,
};
pub use resolver::FieldResolver;
pub use service::ProductCatalog;
