pub mod config_service;
pub mod http;
pub mod image_file;
pub mod paths;
pub mod session_store;
pub mod storage;

pub use crate::config_service::ConfigService;
pub use crate::http::{
    ApiClient, HttpAuthApi, HttpCartApi, HttpFriendsApi, HttpProductCatalog, HttpProductSearch,
};
pub use crate::paths::FynddPaths;
pub use crate::session_store::StoredSessionStore;
pub use crate::storage::{JsonFileStore, MemoryStore};
