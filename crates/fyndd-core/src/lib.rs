//! Domain layer of the Fyndd client.
//!
//! Pure models and algorithms (product normalisation, the friend-request
//! state machine) plus the traits that infrastructure implements and the
//! application layer consumes.

pub mod auth;
pub mod camera;
pub mod cart;
pub mod clock;
pub mod config;
pub mod error;
pub mod friend;
pub mod product;
pub mod search;
pub mod state;

// Re-export common error type
pub use error::{FynddError, Result};
