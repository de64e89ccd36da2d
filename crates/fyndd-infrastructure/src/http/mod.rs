//! Backend REST clients.
//!
//! # Module Structure
//!
//! - `api_client`: base URL, bearer token and status mapping shared by all clients
//! - `search_client`, `products_client`, `friends_client`, `cart_client`,
//!   `auth_client`: one client per core service trait

pub mod api_client;
mod auth_client;
mod cart_client;
mod friends_client;
mod products_client;
mod search_client;

pub use api_client::{Access, ApiClient};
pub use auth_client::HttpAuthApi;
pub use cart_client::HttpCartApi;
pub use friends_client::HttpFriendsApi;
pub use products_client::HttpProductCatalog;
pub use search_client::{HYBRID_SEARCH_PATH, HttpProductSearch};
