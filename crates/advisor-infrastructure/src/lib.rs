//! Infrastructure layer: file-backed storage, the JSON catalog source,
//! platform paths and configuration loading.

pub mod catalog_source;
pub mod config_service;
pub mod paths;
pub mod storage;

pub use catalog_source::JsonFileCatalogSource;
pub use config_service::{ApiCredentials, ConfigService};
pub use paths::AdvisorPaths;
pub use storage::{InMemoryKeyValueStore, JsonFileKeyValueStore};
