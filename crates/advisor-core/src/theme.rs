//! Persisted light/dark theme preference.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::AdvisorError;
use crate::storage::{KeyValueStore, THEME_KEY};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = AdvisorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(AdvisorError::invalid_input(format!("unknown theme '{other}'"))),
        }
    }
}

/// Best-effort reader/writer of the theme key.
pub struct ThemeStore {
    storage: Arc<dyn KeyValueStore>,
}

impl ThemeStore {
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self { storage }
    }

    /// The saved theme, or the default when absent or unreadable.
    pub fn load(&self) -> Theme {
        match self.storage.get(THEME_KEY) {
            Ok(Some(raw)) => raw.parse().unwrap_or_else(|e| {
                tracing::warn!("[Theme] Ignoring saved theme: {}", e);
                Theme::default()
            }),
            Ok(None) => Theme::default(),
            Err(e) => {
                tracing::error!("[Theme] Failed to read theme preference: {}", e);
                Theme::default()
            }
        }
    }

    pub fn save(&self, theme: Theme) {
        if let Err(e) = self.storage.set(THEME_KEY, theme.as_str()) {
            tracing::error!("[Theme] Failed to save theme preference: {}", e);
        }
    }

    /// Flips the saved theme and returns the new value.
    pub fn toggle(&self) -> Theme {
        let theme = self.load().toggled();
        self.save(theme);
        theme
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::InMemoryKeyValueStore;
    use crate::storage::testing::UnavailableStore;

    #[test]
    fn defaults_to_light() {
        let themes = ThemeStore::new(Arc::new(InMemoryKeyValueStore::new()));
        assert_eq!(themes.load(), Theme::Light);
    }

    #[test]
    fn toggle_persists() {
        let storage = Arc::new(InMemoryKeyValueStore::new());
        let themes = ThemeStore::new(storage.clone());

        assert_eq!(themes.toggle(), Theme::Dark);
        assert_eq!(storage.get(THEME_KEY).unwrap().as_deref(), Some("dark"));
        assert_eq!(themes.toggle(), Theme::Light);
    }

    #[test]
    fn garbage_and_unavailable_storage_fall_back_to_default() {
        let storage = Arc::new(InMemoryKeyValueStore::with_entry(THEME_KEY, "sepia"));
        assert_eq!(ThemeStore::new(storage).load(), Theme::Light);

        let themes = ThemeStore::new(Arc::new(UnavailableStore));
        assert_eq!(themes.load(), Theme::Light);
        assert_eq!(themes.toggle(), Theme::Dark);
    }
}
