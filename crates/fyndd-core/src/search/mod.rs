//! Product search: text or image queries against the hybrid-search endpoint.

pub mod model;
pub mod service;

pub use model::{ImageBlob, MAX_IMAGE_BYTES, SearchMode, SearchQuery};
pub use service::ProductSearchService;
