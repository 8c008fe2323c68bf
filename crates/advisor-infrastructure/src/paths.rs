//! Unified path management for advisor configuration and data files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/advisor/           # Config directory
//! ├── config.toml              # Application configuration
//! └── secret.json              # API keys
//!
//! ~/.local/share/advisor/      # Data directory
//! ├── storage.json             # Persisted selection and theme
//! └── history.txt              # REPL line history
//! ```

use std::path::PathBuf;

const APP_DIR: &str = "advisor";

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Home directory could not be determined.
    HomeDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::HomeDirNotFound => write!(f, "Cannot find home directory"),
        }
    }
}

impl std::error::Error for PathError {}

/// Platform paths (XDG on Linux, the platform convention elsewhere).
pub struct AdvisorPaths;

impl AdvisorPaths {
    /// Returns the advisor configuration directory (e.g. `~/.config/advisor/`).
    pub fn config_dir() -> Result<PathBuf, PathError> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or(PathError::HomeDirNotFound)
    }

    /// Returns the advisor data directory (e.g. `~/.local/share/advisor/`).
    pub fn data_dir() -> Result<PathBuf, PathError> {
        dirs::data_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or(PathError::HomeDirNotFound)
    }

    /// Returns the path to the main configuration file.
    pub fn config_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Returns the path to the secrets file.
    ///
    /// # Security Note
    ///
    /// Ensure this file has appropriate permissions (e.g., 600) to prevent
    /// unauthorized access.
    pub fn secret_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("secret.json"))
    }

    /// Returns the path of the durable key-value store.
    pub fn storage_file() -> Result<PathBuf, PathError> {
        Ok(Self::data_dir()?.join("storage.json"))
    }

    /// Returns the path of the REPL line history.
    pub fn history_file() -> Result<PathBuf, PathError> {
        Ok(Self::data_dir()?.join("history.txt"))
    }
}
