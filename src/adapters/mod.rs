//! Adapters implementing domain ports.
//!
//! Infrastructure implementations of the traits defined in the ports module.

pub mod in_memory_store;
pub mod json_file_store;

pub use in_memory_store::InMemoryStore;
pub use json_file_store::JsonFileStore;
