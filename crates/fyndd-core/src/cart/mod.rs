//! Cart domain module.

mod model;
mod service;

pub use model::{Cart, CartItem, FriendCart};
pub use service::CartApi;
