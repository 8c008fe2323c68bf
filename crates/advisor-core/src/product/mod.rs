//! Product catalog domain.

pub mod catalog;
pub mod model;
pub mod repository;

pub use catalog::ProductCatalog;
pub use model::{CatalogFilter, Product, ProductId};
pub use repository::CatalogSource;
