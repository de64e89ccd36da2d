//! Client-local state persistence.

pub mod store;

pub use store::{ClientStateStore, KeyValueStore, StorageKey};
