//! File-backed key-value store.
//!
//! All keys live in one JSON object. Writes go through a temporary file and an
//! atomic rename so a crash never leaves a half-written document behind.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::Write as IoWrite;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use advisor_core::error::{AdvisorError, Result};
use advisor_core::storage::KeyValueStore;

type Document = BTreeMap<String, String>;

/// A `KeyValueStore` persisted as a single JSON object on disk.
pub struct JsonFileKeyValueStore {
    path: PathBuf,
    // Serializes read-modify-write cycles within the process.
    write_lock: Mutex<()>,
}

impl JsonFileKeyValueStore {
    /// Creates a store handle. The file is created on first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the whole document.
    ///
    /// A missing or empty file is an empty document.
    fn read_document(&self) -> Result<Document> {
        if !self.path.exists() {
            return Ok(Document::new());
        }

        let content = fs::read_to_string(&self.path).map_err(|e| {
            AdvisorError::persistence(format!("failed to read {}: {}", self.path.display(), e))
        })?;

        if content.trim().is_empty() {
            return Ok(Document::new());
        }

        serde_json::from_str(&content).map_err(|e| {
            AdvisorError::persistence(format!("failed to parse {}: {}", self.path.display(), e))
        })
    }

    fn write_document(&self, document: &Document) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent).map_err(persistence_io)?;
        }

        let json = serde_json::to_string_pretty(document)
            .map_err(|e| AdvisorError::persistence(format!("failed to serialize store: {e}")))?;

        let tmp_path = self.temp_path();
        let mut tmp_file = File::create(&tmp_path).map_err(persistence_io)?;
        tmp_file.write_all(json.as_bytes()).map_err(persistence_io)?;
        tmp_file.sync_all().map_err(persistence_io)?;
        drop(tmp_file);

        fs::rename(&tmp_path, &self.path).map_err(persistence_io)
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "storage.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl KeyValueStore for JsonFileKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_document()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|e| AdvisorError::persistence(format!("store lock poisoned: {e}")))?;

        // An unreadable document is replaced rather than blocking every write.
        let mut document = self.read_document().unwrap_or_else(|e| {
            tracing::warn!("[Storage] Discarding unreadable store: {}", e);
            Document::new()
        });
        document.insert(key.to_string(), value.to_string());
        self.write_document(&document)
    }
}

fn persistence_io(err: std::io::Error) -> AdvisorError {
    AdvisorError::persistence(format!("{} (kind: {:?})", err, err.kind()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use advisor_core::storage::{SELECTED_PRODUCTS_KEY, THEME_KEY};
    use tempfile::TempDir;

    #[test]
    fn missing_file_reads_as_empty() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileKeyValueStore::new(dir.path().join("storage.json"));
        assert_eq!(store.get(THEME_KEY).unwrap(), None);
    }

    #[test]
    fn set_creates_parent_dirs_and_keeps_other_keys() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("storage.json");
        let store = JsonFileKeyValueStore::new(&path);

        store.set(THEME_KEY, "dark").unwrap();
        store.set(SELECTED_PRODUCTS_KEY, "[]").unwrap();

        let reopened = JsonFileKeyValueStore::new(&path);
        assert_eq!(reopened.get(THEME_KEY).unwrap().as_deref(), Some("dark"));
        assert_eq!(reopened.get(SELECTED_PRODUCTS_KEY).unwrap().as_deref(), Some("[]"));
        assert!(!path.with_file_name("storage.json.tmp").exists());
    }

    #[test]
    fn corrupt_file_fails_reads_but_not_writes() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("storage.json");
        fs::write(&path, "{ not json").unwrap();
        let store = JsonFileKeyValueStore::new(&path);

        assert!(store.get(THEME_KEY).unwrap_err().is_persistence());

        store.set(THEME_KEY, "light").unwrap();
        assert_eq!(store.get(THEME_KEY).unwrap().as_deref(), Some("light"));
    }
}
