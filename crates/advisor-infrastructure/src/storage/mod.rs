//! Storage layer implementations.

pub mod json_file_store;

pub use advisor_core::storage::InMemoryKeyValueStore;
pub use json_file_store::JsonFileKeyValueStore;
