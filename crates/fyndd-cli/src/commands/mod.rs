pub mod auth;
pub mod cart;
pub mod friends;
pub mod output;
pub mod products;
pub mod search;

pub use auth::AuthAction;
pub use cart::CartAction;
pub use friends::FriendsAction;
pub use output::Output;
pub use products::ProductsAction;
pub use search::SearchAction;
