//! Wires the use case to the concrete infrastructure and remote agents.

use std::path::PathBuf;
use std::sync::Arc;

use advisor_core::config::AdvisorConfig;
use advisor_core::storage::KeyValueStore;
use advisor_infrastructure::{
    AdvisorPaths, ApiCredentials, InMemoryKeyValueStore, JsonFileCatalogSource,
    JsonFileKeyValueStore,
};
use advisor_interaction::{BraveSearchAgent, OpenAIChatAgent};
use anyhow::{Context, Result};

use crate::advisor_usecase::AdvisorUseCase;

/// Command-line overrides applied on top of `config.toml`.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub catalog_path: Option<PathBuf>,
}

/// Chooses the durable store: the configured path, then the data dir, then memory.
pub fn open_storage(config: &AdvisorConfig) -> Arc<dyn KeyValueStore> {
    let path = config
        .storage
        .path
        .clone()
        .or_else(|| AdvisorPaths::storage_file().ok());

    match path {
        Some(path) => {
            tracing::debug!("[Bootstrap] Using storage file {}", path.display());
            Arc::new(JsonFileKeyValueStore::new(path))
        }
        None => {
            tracing::warn!("[Bootstrap] No data directory; selection will not survive restarts");
            Arc::new(InMemoryKeyValueStore::new())
        }
    }
}

/// Builds an uninitialized use case.
///
/// Requires an OpenAI key. Web search is enabled only when `[search]` allows
/// it and a Brave key is available.
pub fn build_usecase(
    config: &AdvisorConfig,
    credentials: &ApiCredentials,
    overrides: &Overrides,
) -> Result<AdvisorUseCase> {
    let api_key = credentials.openai_api_key.clone().context(
        "OpenAI API key not found. Set it in secret.json or the OPENAI_API_KEY environment variable",
    )?;

    let chat_agent = chat_agent(api_key, config, credentials)?;
    tracing::info!("[Bootstrap] Chat model: {}", chat_agent.model());

    let catalog_path = overrides
        .catalog_path
        .clone()
        .unwrap_or_else(|| config.catalog.path.clone());
    let catalog_source = JsonFileCatalogSource::new(catalog_path);

    let mut usecase = AdvisorUseCase::new(
        open_storage(config),
        Arc::new(catalog_source),
        Arc::new(chat_agent),
    )
    .with_chat_config(config.chat.clone());

    match (&credentials.brave_api_key, config.search.enabled) {
        (Some(key), true) => {
            let search_agent = BraveSearchAgent::from_config(key.clone(), &config.search)?;
            usecase = usecase.with_search_service(Arc::new(search_agent));
        }
        (None, true) => {
            tracing::info!("[Bootstrap] No Brave API key; web search disabled");
        }
        (_, false) => {
            tracing::debug!("[Bootstrap] Web search disabled by config");
        }
    }

    Ok(usecase)
}

/// `OPENAI_MODEL_NAME` (or `secret.json`) wins over `[chat] model`.
fn chat_agent(
    api_key: String,
    config: &AdvisorConfig,
    credentials: &ApiCredentials,
) -> Result<OpenAIChatAgent> {
    let agent = OpenAIChatAgent::from_config(api_key, &config.chat)?;
    Ok(match &credentials.openai_model {
        Some(model) => agent.with_model(model.clone()),
        None => agent,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use advisor_core::config::StorageConfig;

    #[test]
    fn missing_openai_key_is_an_error() {
        let result = build_usecase(
            &AdvisorConfig::default(),
            &ApiCredentials::default(),
            &Overrides::default(),
        );
        let message = result.err().map(|e| e.to_string()).unwrap_or_default();
        assert!(message.contains("OPENAI_API_KEY"));
    }

    #[test]
    fn builds_with_credentials() {
        let dir = tempfile::tempdir().unwrap();
        let config = AdvisorConfig {
            storage: StorageConfig {
                path: Some(dir.path().join("storage.json")),
            },
            ..AdvisorConfig::default()
        };
        let credentials = ApiCredentials {
            openai_api_key: Some("sk-test".into()),
            openai_model: None,
            brave_api_key: Some("brave-test".into()),
        };

        assert!(build_usecase(&config, &credentials, &Overrides::default()).is_ok());
    }

    #[test]
    fn credential_model_overrides_configured_model() {
        let config = AdvisorConfig::default();
        let mut credentials = ApiCredentials {
            openai_api_key: Some("sk-test".into()),
            ..ApiCredentials::default()
        };

        let agent = chat_agent("sk-test".into(), &config, &credentials).unwrap();
        assert_eq!(agent.model(), config.chat.model);

        credentials.openai_model = Some("gpt-4o-mini".into());
        let agent = chat_agent("sk-test".into(), &config, &credentials).unwrap();
        assert_eq!(agent.model(), "gpt-4o-mini");
    }
}
