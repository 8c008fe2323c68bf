//! `advisor products`: one-shot catalog listing.

use std::path::PathBuf;

use anyhow::{Context, Result};

use advisor_application::open_storage;
use advisor_core::config::AdvisorConfig;
use advisor_core::product::{CatalogFilter, CatalogSource, ProductCatalog};
use advisor_core::session::SessionState;
use advisor_infrastructure::JsonFileCatalogSource;

use super::render;

pub async fn list(
    config: &AdvisorConfig,
    catalog_path: Option<PathBuf>,
    category: Option<String>,
    search: String,
) -> Result<()> {
    let path = catalog_path.unwrap_or_else(|| config.catalog.path.clone());
    let products = JsonFileCatalogSource::new(&path)
        .load()
        .await
        .with_context(|| format!("Failed to load products from {}", path.display()))?;
    let catalog = ProductCatalog::new(products);

    let mut session = SessionState::restore(open_storage(config));
    session.selection_mut().reconcile(&catalog);

    let filter = CatalogFilter::new(category, search);
    let shown = catalog.filter(&filter);
    let summary = filter.describe(shown.len(), catalog.len());

    let shown: Vec<_> = shown.into_iter().cloned().collect();
    render::print_products(&shown, summary.as_deref(), |p| session.selection().contains(p.id));

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use advisor_core::config::StorageConfig;
    use advisor_core::storage::{KeyValueStore, SELECTED_PRODUCTS_KEY};
    use advisor_infrastructure::JsonFileKeyValueStore;
    use tempfile::TempDir;

    #[tokio::test]
    async fn listing_prunes_selected_products_missing_from_catalog() {
        let dir = TempDir::new().unwrap();
        let storage_path = dir.path().join("storage.json");
        let catalog_path = dir.path().join("products.json");

        JsonFileKeyValueStore::new(&storage_path)
            .set(
                SELECTED_PRODUCTS_KEY,
                r#"[{"id":99,"name":"Gone","brand":"B","category":"c","description":"","image":""}]"#,
            )
            .unwrap();
        std::fs::write(
            &catalog_path,
            r#"{"products":[{"id":1,"name":"Foaming Cleanser","brand":"CeraVe","category":"cleanser","description":"","image":""}]}"#,
        )
        .unwrap();

        let config = AdvisorConfig {
            storage: StorageConfig {
                path: Some(storage_path.clone()),
            },
            ..AdvisorConfig::default()
        };
        list(&config, Some(catalog_path), None, String::new())
            .await
            .unwrap();

        let persisted = JsonFileKeyValueStore::new(&storage_path)
            .get(SELECTED_PRODUCTS_KEY)
            .unwrap();
        assert_eq!(persisted.as_deref(), Some("[]"));
    }
}
