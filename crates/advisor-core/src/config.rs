//! Configuration models.
//!
//! `AdvisorConfig` is read from `config.toml`, `SecretConfig` from
//! `secret.json`. Every field has a default so partial files are accepted.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::chat::{CHAT_MAX_TOKENS, DEFAULT_TEMPERATURE, ROUTINE_MAX_TOKENS};

pub const DEFAULT_CHAT_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_CHAT_MODEL: &str = "gpt-4o";
pub const DEFAULT_SEARCH_ENDPOINT: &str = "https://api.search.brave.com/res/v1/web/search";
pub const DEFAULT_CATALOG_PATH: &str = "products.json";

/// Root of `config.toml`.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct AdvisorConfig {
    pub catalog: CatalogConfig,
    pub chat: ChatConfig,
    pub search: SearchConfig,
    pub storage: StorageConfig,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct CatalogConfig {
    /// Path of the `{ "products": [...] }` document.
    pub path: PathBuf,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_CATALOG_PATH),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ChatConfig {
    pub endpoint: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub routine_max_tokens: u32,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_CHAT_ENDPOINT.to_string(),
            model: DEFAULT_CHAT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: CHAT_MAX_TOKENS,
            routine_max_tokens: ROUTINE_MAX_TOKENS,
            timeout_secs: 60,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct SearchConfig {
    pub enabled: bool,
    pub endpoint: String,
    /// Number of hits requested from the search API.
    pub count: u32,
    /// Number of hits kept for the prompt.
    pub max_results: usize,
    pub timeout_secs: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: DEFAULT_SEARCH_ENDPOINT.to_string(),
            count: 5,
            max_results: 3,
            timeout_secs: 15,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct StorageConfig {
    /// Overrides the storage file location (defaults to the data dir).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

/// Root of `secret.json`.
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct SecretConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub openai: Option<OpenAIConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brave: Option<BraveConfig>,
}

/// OpenAI API configuration
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct OpenAIConfig {
    pub api_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_name: Option<String>,
}

/// Brave Search API configuration
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct BraveConfig {
    pub api_key: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_toml_keeps_defaults() {
        let config: AdvisorConfig = toml::from_str(
            r#"
            [chat]
            model = "gpt-4o-mini"

            [search]
            enabled = false
            "#,
        )
        .unwrap();

        assert_eq!(config.chat.model, "gpt-4o-mini");
        assert_eq!(config.chat.max_tokens, CHAT_MAX_TOKENS);
        assert!(!config.search.enabled);
        assert_eq!(config.search.count, 5);
        assert_eq!(config.catalog.path, PathBuf::from(DEFAULT_CATALOG_PATH));
    }

    #[test]
    fn secret_json_sections_are_optional() {
        let secrets: SecretConfig =
            serde_json::from_str(r#"{"brave": {"api_key": "b"}}"#).unwrap();
        assert!(secrets.openai.is_none());
        assert_eq!(secrets.brave.unwrap().api_key, "b");
    }
}
