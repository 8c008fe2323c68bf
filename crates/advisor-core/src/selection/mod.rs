//! User-curated product selection.
//!
//! `SelectionStore` owns the ordered selection set, keeps it consistent with
//! the current catalog and mirrors every mutation to durable storage.

use std::collections::HashSet;
use std::sync::Arc;

use serde_json::Value;

use crate::product::{Product, ProductCatalog, ProductId};
use crate::storage::{KeyValueStore, SELECTED_PRODUCTS_KEY};

/// Callback invoked with the full selection after every persisted mutation.
pub type SelectionObserver = Arc<dyn Fn(&[Product]) + Send + Sync>;

/// Ordered, id-unique set of selected products backed by a `KeyValueStore`.
///
/// The in-memory set is authoritative for the session. Storage failures are
/// logged and never propagated.
pub struct SelectionStore {
    products: Vec<Product>,
    storage: Arc<dyn KeyValueStore>,
    observers: Vec<SelectionObserver>,
}

impl SelectionStore {
    /// Creates an empty selection. Nothing is read from or written to storage.
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self {
            products: Vec::new(),
            storage,
            observers: Vec::new(),
        }
    }

    /// Creates a selection restored from storage.
    pub fn restored(storage: Arc<dyn KeyValueStore>) -> Self {
        let mut store = Self::new(storage);
        store.restore();
        store
    }

    /// Registers a listener notified after every mutation.
    pub fn subscribe(&mut self, observer: SelectionObserver) {
        self.observers.push(observer);
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn contains(&self, id: ProductId) -> bool {
        self.products.iter().any(|product| product.id == id)
    }

    pub fn find(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|product| product.id == id)
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Removes `product` if selected, appends it otherwise.
    ///
    /// Returns whether the product is selected afterwards.
    pub fn toggle(&mut self, product: &Product) -> bool {
        let selected = match self.products.iter().position(|p| p.id == product.id) {
            Some(index) => {
                self.products.remove(index);
                tracing::debug!("[Selection] Removed product {}", product.id);
                false
            }
            None => {
                self.products.push(product.clone());
                tracing::debug!("[Selection] Added product {}", product.id);
                true
            }
        };

        self.commit();
        selected
    }

    /// Empties the selection.
    ///
    /// Callers are expected to confirm with the user before invoking this.
    pub fn clear(&mut self) {
        self.products.clear();
        tracing::info!("[Selection] Cleared all selected products");
        self.commit();
    }

    /// Replaces the in-memory set with the persisted one.
    ///
    /// Unreadable or malformed data resets the selection to empty. Individual
    /// records that are not valid products are dropped, and repeated ids keep
    /// their first occurrence.
    pub fn restore(&mut self) {
        self.products = match self.storage.get(SELECTED_PRODUCTS_KEY) {
            Ok(Some(raw)) => parse_persisted(&raw),
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::error!("[Selection] Failed to read persisted selection: {}", e);
                Vec::new()
            }
        };

        tracing::info!("[Selection] Restored {} selected products", self.products.len());
    }

    /// Drops members whose id is not in `catalog`.
    ///
    /// Persists only when something was removed. Returns the number of
    /// removed members.
    pub fn reconcile(&mut self, catalog: &ProductCatalog) -> usize {
        let before = self.products.len();
        self.products.retain(|product| catalog.contains(product.id));
        let removed = before - self.products.len();

        if removed > 0 {
            tracing::info!(
                "[Selection] Removed {} products no longer in the catalog",
                removed
            );
            self.commit();
        }

        removed
    }

    /// Writes the full ordered selection to storage.
    ///
    /// Failures are logged; the in-memory selection is unaffected.
    pub fn persist(&self) {
        let serialized = match serde_json::to_string(&self.products) {
            Ok(json) => json,
            Err(e) => {
                tracing::error!("[Selection] Failed to serialize selection: {}", e);
                return;
            }
        };

        if let Err(e) = self.storage.set(SELECTED_PRODUCTS_KEY, &serialized) {
            tracing::error!("[Selection] Failed to save selected products: {}", e);
        }
    }

    fn commit(&self) {
        self.persist();
        for observer in &self.observers {
            observer(&self.products);
        }
    }
}

fn parse_persisted(raw: &str) -> Vec<Product> {
    let records = match serde_json::from_str::<Value>(raw) {
        Ok(Value::Array(records)) => records,
        Ok(other) => {
            tracing::error!(
                "[Selection] Persisted selection is not an array (found {}), resetting",
                json_kind(&other)
            );
            return Vec::new();
        }
        Err(e) => {
            tracing::error!("[Selection] Persisted selection is malformed, resetting: {}", e);
            return Vec::new();
        }
    };

    let mut seen = HashSet::new();
    records
        .into_iter()
        .filter_map(|record| match serde_json::from_value::<Product>(record) {
            Ok(product) => Some(product),
            Err(e) => {
                tracing::warn!("[Selection] Dropping malformed persisted product: {}", e);
                None
            }
        })
        .filter(|product| seen.insert(product.id))
        .collect()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
