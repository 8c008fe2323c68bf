//! Brave Web Search agent.
//!
//! Issues web search requests against the Brave Search API and maps the hits
//! to `WebSearchResult`s for prompt augmentation.

use std::time::Duration;

use advisor_core::config::{DEFAULT_SEARCH_ENDPOINT, SearchConfig};
use advisor_core::error::{AdvisorError, Result};
use advisor_core::search::{WebSearchResult, WebSearchService};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

const SERVICE: &str = "brave";

/// Agent capable of calling the Brave web search endpoint.
#[derive(Clone)]
pub struct BraveSearchAgent {
    client: Client,
    endpoint: String,
    api_key: String,
    count: u32,
    max_results: usize,
}

impl BraveSearchAgent {
    /// Creates a new agent using the provided subscription token.
    pub fn new(api_key: impl Into<String>) -> Self {
        let defaults = SearchConfig::default();
        Self {
            client: Client::new(),
            endpoint: DEFAULT_SEARCH_ENDPOINT.to_string(),
            api_key: api_key.into(),
            count: defaults.count,
            max_results: defaults.max_results,
        }
    }

    /// Creates an agent from `[search]` settings.
    pub fn from_config(api_key: impl Into<String>, config: &SearchConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AdvisorError::config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            api_key: api_key.into(),
            count: config.count,
            max_results: config.max_results,
        })
    }

    /// Overrides the endpoint URL (proxies, tests).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

#[async_trait]
impl WebSearchService for BraveSearchAgent {
    async fn search(&self, query: &str) -> Result<Vec<WebSearchResult>> {
        let count = self.count.to_string();
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("q", query),
                ("count", count.as_str()),
                ("search_lang", "en"),
                ("country", "us"),
                ("safesearch", "strict"),
            ])
            .header("Accept", "application/json")
            .header("X-Subscription-Token", &self.api_key)
            .send()
            .await
            .map_err(|err| {
                AdvisorError::remote(SERVICE, None, format!("Brave Search request failed: {err}"))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AdvisorError::remote(SERVICE, Some(status.as_u16()), body));
        }

        let payload: SearchResponse = response.json().await.map_err(|err| {
            AdvisorError::remote(
                SERVICE,
                None,
                format!("Failed to parse Brave Search response: {err}"),
            )
        })?;

        let results = payload.into_results(self.max_results);
        tracing::debug!("[BraveSearch] {} results for query", results.len());
        Ok(results)
    }
}

#[derive(Deserialize, Default)]
struct SearchResponse {
    #[serde(default)]
    web: Option<WebSection>,
}

#[derive(Deserialize, Default)]
struct WebSection {
    #[serde(default)]
    results: Vec<RawResult>,
}

#[derive(Deserialize)]
struct RawResult {
    #[serde(default)]
    title: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    snippet: Option<String>,
}

impl SearchResponse {
    fn into_results(self, limit: usize) -> Vec<WebSearchResult> {
        self.web
            .map(|web| web.results)
            .unwrap_or_default()
            .into_iter()
            .filter(|raw| !raw.url.is_empty())
            .take(limit)
            .map(|raw| WebSearchResult {
                title: raw.title,
                url: raw.url,
                snippet: raw.snippet.or(raw.description).unwrap_or_default(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    #[tokio::test]
    async fn keeps_first_results_with_snippet_fallback() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/res/v1/web/search")
                    .query_param("q", "latest serum")
                    .query_param("count", "5")
                    .query_param("safesearch", "strict")
                    .header("X-Subscription-Token", "brave-key");
                then.status(200).json_body(json!({
                    "web": {"results": [
                        {"title": "One", "url": "https://a.com", "description": "desc one"},
                        {"title": "Two", "url": "https://b.com", "snippet": "snip two", "description": "desc two"},
                        {"title": "No url"},
                        {"title": "Three", "url": "https://c.com"},
                        {"title": "Four", "url": "https://d.com"}
                    ]}
                }));
            })
            .await;

        let agent =
            BraveSearchAgent::new("brave-key").with_endpoint(server.url("/res/v1/web/search"));
        let results = agent.search("latest serum").await.unwrap();

        mock.assert_async().await;
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].snippet, "desc one");
        assert_eq!(results[1].snippet, "snip two");
        assert_eq!(results[2].title, "Three");
        assert_eq!(results[2].snippet, "");
    }

    #[tokio::test]
    async fn missing_web_section_is_empty() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET);
                then.status(200).json_body(json!({"query": {}}));
            })
            .await;

        let agent = BraveSearchAgent::new("k").with_endpoint(server.url("/search"));
        assert!(agent.search("q").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn error_status_is_a_remote_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET);
                then.status(401).body("unauthorized");
            })
            .await;

        let agent = BraveSearchAgent::new("bad").with_endpoint(server.url("/search"));
        let err = agent.search("q").await.unwrap_err();
        assert!(matches!(err, AdvisorError::RemoteService { status: Some(401), .. }));
    }
}
