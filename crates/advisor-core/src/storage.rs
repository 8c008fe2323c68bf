//! Durable key-value storage abstraction.
//!
//! The advisor persists two values: the selected products and the theme
//! preference. Both writes are best-effort; callers log failures and carry on
//! with their in-memory state.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::{AdvisorError, Result};

/// Storage key of the persisted selection set.
pub const SELECTED_PRODUCTS_KEY: &str = "loreal-selected-products";

/// Storage key of the theme preference.
pub const THEME_KEY: &str = "theme";

/// A string key-value surface (the equivalent of browser `localStorage`).
pub trait KeyValueStore: Send + Sync {
    /// Returns the stored value, or `None` if the key was never written.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// Process-local store, used for tests and for running without a data dir.
#[derive(Debug, Default)]
pub struct InMemoryKeyValueStore {
    entries: Mutex<HashMap<String, String>>,
    writes: AtomicUsize,
}

impl InMemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with a single entry.
    pub fn with_entry(key: impl Into<String>, value: impl Into<String>) -> Self {
        let store = Self::default();
        if let Ok(mut entries) = store.entries.lock() {
            entries.insert(key.into(), value.into());
        }
        store
    }

    /// Number of successful `set` calls since construction.
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

impl KeyValueStore for InMemoryKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self
            .entries
            .lock()
            .map_err(|e| AdvisorError::persistence(format!("store lock poisoned: {e}")))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| AdvisorError::persistence(format!("store lock poisoned: {e}")))?;
        entries.insert(key.to_string(), value.to_string());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_memory_store_counts_writes() {
        let store = InMemoryKeyValueStore::new();
        assert_eq!(store.get("missing").unwrap(), None);

        store.set(THEME_KEY, "dark").unwrap();
        store.set(THEME_KEY, "light").unwrap();

        assert_eq!(store.get(THEME_KEY).unwrap().as_deref(), Some("light"));
        assert_eq!(store.writes(), 2);
    }

    #[test]
    fn seeded_entry_does_not_count_as_write() {
        let store = InMemoryKeyValueStore::with_entry(SELECTED_PRODUCTS_KEY, "[]");
        assert_eq!(store.writes(), 0);
        assert_eq!(store.get(SELECTED_PRODUCTS_KEY).unwrap().as_deref(), Some("[]"));
    }
}
