//! Configuration service implementation.
//!
//! Loads `config.toml` and `secret.json` from the advisor config directory,
//! falling back to defaults and environment variables.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use advisor_core::config::{AdvisorConfig, SecretConfig};
use advisor_core::error::{AdvisorError, Result};

use crate::paths::AdvisorPaths;

/// API credentials after merging `secret.json` with the environment.
#[derive(Debug, Clone, Default)]
pub struct ApiCredentials {
    pub openai_api_key: Option<String>,
    pub openai_model: Option<String>,
    pub brave_api_key: Option<String>,
}

/// Loads the application configuration and secrets.
#[derive(Debug, Clone)]
pub struct ConfigService {
    config_path: Option<PathBuf>,
    secret_path: Option<PathBuf>,
}

impl ConfigService {
    /// Uses the platform config directory.
    pub fn new() -> Self {
        Self {
            config_path: AdvisorPaths::config_file().ok(),
            secret_path: AdvisorPaths::secret_file().ok(),
        }
    }

    /// Uses explicit file locations (for `--config` and tests).
    pub fn with_paths(config_path: Option<PathBuf>, secret_path: Option<PathBuf>) -> Self {
        Self {
            config_path,
            secret_path,
        }
    }

    /// Overrides only the `config.toml` location.
    pub fn with_config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = Some(path.into());
        self
    }

    /// Loads `config.toml`. A missing file yields the defaults; an invalid
    /// one is a `Config` error.
    pub fn load_config(&self) -> Result<AdvisorConfig> {
        let Some(path) = self.config_path.as_deref() else {
            tracing::warn!("[Config] No config directory available, using defaults");
            return Ok(AdvisorConfig::default());
        };

        if !path.exists() {
            tracing::debug!("[Config] {} not found, using defaults", path.display());
            return Ok(AdvisorConfig::default());
        }

        let content = fs::read_to_string(path).map_err(|e| {
            AdvisorError::config(format!("failed to read {}: {}", path.display(), e))
        })?;

        toml::from_str(&content).map_err(|e| {
            AdvisorError::config(format!("failed to parse {}: {}", path.display(), e))
        })
    }

    /// Loads `secret.json`, if present.
    pub fn load_secrets(&self) -> Result<Option<SecretConfig>> {
        let Some(path) = self.secret_path.as_deref() else {
            return Ok(None);
        };
        load_secret_file(path)
    }

    /// Resolves API credentials.
    ///
    /// Priority:
    /// 1. `secret.json`
    /// 2. Environment variables (`OPENAI_API_KEY`, `OPENAI_MODEL_NAME`, `BRAVE_API_KEY`)
    pub fn credentials(&self) -> ApiCredentials {
        let secrets = self.load_secrets().unwrap_or_else(|e| {
            tracing::warn!("[Config] Ignoring unreadable secret file: {}", e);
            None
        });
        resolve_credentials(secrets.unwrap_or_default(), |name| env::var(name).ok())
    }
}

impl Default for ConfigService {
    fn default() -> Self {
        Self::new()
    }
}

fn load_secret_file(path: &Path) -> Result<Option<SecretConfig>> {
    if !path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(path)?;
    let secrets = serde_json::from_str(&content).map_err(|e| {
        AdvisorError::config(format!("failed to parse {}: {}", path.display(), e))
    })?;
    Ok(Some(secrets))
}

fn resolve_credentials(
    secrets: SecretConfig,
    env_lookup: impl Fn(&str) -> Option<String>,
) -> ApiCredentials {
    let non_empty = |value: Option<String>| value.filter(|v| !v.trim().is_empty());

    let (openai_api_key, openai_model) = match secrets.openai {
        Some(openai) => (Some(openai.api_key), openai.model_name),
        None => (None, None),
    };

    ApiCredentials {
        openai_api_key: non_empty(openai_api_key)
            .or_else(|| non_empty(env_lookup("OPENAI_API_KEY"))),
        openai_model: non_empty(openai_model)
            .or_else(|| non_empty(env_lookup("OPENAI_MODEL_NAME"))),
        brave_api_key: non_empty(secrets.brave.map(|brave| brave.api_key))
            .or_else(|| non_empty(env_lookup("BRAVE_API_KEY"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use advisor_core::config::{BraveConfig, OpenAIConfig};
    use tempfile::TempDir;

    #[test]
    fn missing_config_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let service = ConfigService::with_paths(Some(dir.path().join("config.toml")), None);
        assert_eq!(service.load_config().unwrap(), AdvisorConfig::default());
    }

    #[test]
    fn invalid_config_file_is_config_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[chat\nmodel = 1").unwrap();

        let err = ConfigService::with_paths(Some(path), None)
            .load_config()
            .unwrap_err();
        assert!(matches!(err, AdvisorError::Config(_)));
    }

    #[test]
    fn config_file_overrides_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[catalog]\npath = \"/srv/products.json\"\n").unwrap();

        let config = ConfigService::new().with_config_path(&path).load_config().unwrap();
        assert_eq!(config.catalog.path, PathBuf::from("/srv/products.json"));
    }

    #[test]
    fn secrets_take_priority_over_environment() {
        let secrets = SecretConfig {
            openai: Some(OpenAIConfig {
                api_key: "from-file".into(),
                model_name: None,
            }),
            brave: Some(BraveConfig {
                api_key: "  ".into(),
            }),
        };
        let env = |name: &str| match name {
            "OPENAI_API_KEY" => Some("from-env".to_string()),
            "OPENAI_MODEL_NAME" => Some("gpt-4o-mini".to_string()),
            "BRAVE_API_KEY" => Some("brave-env".to_string()),
            _ => None,
        };

        let credentials = resolve_credentials(secrets, env);

        assert_eq!(credentials.openai_api_key.as_deref(), Some("from-file"));
        assert_eq!(credentials.openai_model.as_deref(), Some("gpt-4o-mini"));
        assert_eq!(credentials.brave_api_key.as_deref(), Some("brave-env"));
    }

    #[test]
    fn secret_file_is_parsed_when_present() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("secret.json");
        fs::write(&path, r#"{"openai": {"api_key": "sk-test", "model_name": "gpt-4o"}}"#).unwrap();

        let secrets = ConfigService::with_paths(None, Some(path))
            .load_secrets()
            .unwrap()
            .unwrap();
        assert_eq!(secrets.openai.unwrap().api_key, "sk-test");
    }

    #[test]
    fn unreadable_secret_path_is_an_io_error() {
        let dir = TempDir::new().unwrap();

        let err = ConfigService::with_paths(None, Some(dir.path().to_path_buf()))
            .load_secrets()
            .unwrap_err();

        assert!(matches!(err, AdvisorError::Io { ref message } if message.contains("kind:")));
    }
}
