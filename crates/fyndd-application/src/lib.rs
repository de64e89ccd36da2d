//! Application layer for the Fyndd client.
//!
//! Use cases coordinate the domain (`fyndd-core`) with the HTTP clients and
//! client-local storage from `fyndd-infrastructure`.

pub mod app;
pub mod auth_usecase;
pub mod cart_usecase;
pub mod friend_request_reconciler;
pub mod friends_usecase;
pub mod product_usecase;
pub mod search_usecase;
pub mod view;

pub use app::FynddApp;
pub use auth_usecase::{AuthUseCase, LoginOutcome, LoginRoute};
pub use cart_usecase::CartUseCase;
pub use friend_request_reconciler::FriendRequestReconciler;
pub use friends_usecase::{FriendsUseCase, UserSearchResult};
pub use product_usecase::{ProductUseCase, RecoveryAction, ViewOutcome};
pub use search_usecase::SearchUseCase;
pub use view::{Loaded, ViewTicket, ViewTracker};
