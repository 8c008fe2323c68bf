//! JSON file catalog source.

use std::path::{Path, PathBuf};

use advisor_core::error::{AdvisorError, Result};
use advisor_core::product::{CatalogSource, Product};
use async_trait::async_trait;
use serde_json::Value;

/// Reads a `{ "products": [...] }` document from disk.
///
/// The document shape is validated explicitly: a missing `products` array
/// fails the load, while individual malformed records are skipped.
#[derive(Debug, Clone)]
pub struct JsonFileCatalogSource {
    path: PathBuf,
}

impl JsonFileCatalogSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl CatalogSource for JsonFileCatalogSource {
    async fn load(&self) -> Result<Vec<Product>> {
        let content = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            AdvisorError::catalog_unavailable(format!(
                "failed to read {}: {}",
                self.path.display(),
                e
            ))
        })?;

        let products = parse_catalog(&content)?;
        tracing::info!(
            "[Catalog] Loaded {} products from {}",
            products.len(),
            self.path.display()
        );
        Ok(products)
    }
}

/// Parses a catalog document, dropping records that are not valid products.
pub fn parse_catalog(content: &str) -> Result<Vec<Product>> {
    let root: Value = serde_json::from_str(content)
        .map_err(|e| AdvisorError::catalog_unavailable(format!("invalid catalog JSON: {e}")))?;

    let records = root
        .get("products")
        .and_then(Value::as_array)
        .ok_or_else(|| AdvisorError::catalog_unavailable("catalog has no 'products' array"))?;

    Ok(records
        .iter()
        .enumerate()
        .filter_map(|(index, record)| {
            serde_json::from_value::<Product>(record.clone())
                .map_err(|e| {
                    tracing::warn!(
                        "[Catalog] Skipping malformed product at index {}: {}",
                        index,
                        e
                    );
                })
                .ok()
        })
        .collect())
}
