//! Client-local storage backends.

mod atomic_file;
mod json_file_store;
mod memory_store;

pub use atomic_file::{AtomicFileError, FileLock, read_if_present, write_atomic};
pub use json_file_store::JsonFileStore;
pub use memory_store::MemoryStore;
