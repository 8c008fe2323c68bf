//! Catalog source trait.

use async_trait::async_trait;

use crate::error::Result;
use crate::product::model::Product;

/// Backing data source of the product catalog.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Loads the full product list, unfiltered.
    ///
    /// Fails with `AdvisorError::CatalogUnavailable` when the source cannot be
    /// read or parsed.
    async fn load(&self) -> Result<Vec<Product>>;
}
