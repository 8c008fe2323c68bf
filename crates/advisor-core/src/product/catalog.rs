//! In-memory product catalog.

use std::collections::HashSet;

use crate::product::model::{CatalogFilter, Product, ProductId};

/// The authoritative product list for the current session.
///
/// Replaced wholesale on every load; selection reconciliation always runs
/// against the most recently loaded instance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductCatalog {
    products: Vec<Product>,
}

impl ProductCatalog {
    /// Creates a catalog, keeping the first occurrence of any duplicated id.
    pub fn new(products: Vec<Product>) -> Self {
        let mut seen = HashSet::new();
        let products = products
            .into_iter()
            .filter(|product| {
                let fresh = seen.insert(product.id);
                if !fresh {
                    tracing::warn!("[Catalog] Duplicate product id {} ignored", product.id);
                }
                fresh
            })
            .collect();
        Self { products }
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn find(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|product| product.id == id)
    }

    pub fn contains(&self, id: ProductId) -> bool {
        self.find(id).is_some()
    }

    /// Distinct categories in first-seen order.
    pub fn categories(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.products
            .iter()
            .map(|product| product.category.as_str())
            .filter(|category| seen.insert(*category))
            .collect()
    }

    /// Products matching `filter`, in catalog order.
    pub fn filter(&self, filter: &CatalogFilter) -> Vec<&Product> {
        self.products
            .iter()
            .filter(|product| filter.matches(product))
            .collect()
    }
}

impl From<Vec<Product>> for ProductCatalog {
    fn from(products: Vec<Product>) -> Self {
        Self::new(products)
    }
}
