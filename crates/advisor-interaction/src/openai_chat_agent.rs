//! OpenAIChatAgent - Direct REST API implementation for OpenAI chat completions.
//!
//! Configuration priority: ~/.config/advisor/secret.json > environment variables

use std::time::Duration;

use advisor_core::chat::{ChatCompletionService, ChatRequest};
use advisor_core::config::{ChatConfig, DEFAULT_CHAT_ENDPOINT, DEFAULT_CHAT_MODEL};
use advisor_core::error::{AdvisorError, Result};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

const SERVICE: &str = "openai";

static BOLD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*\*(.*?)\*\*").expect("valid bold regex"));
static HEADING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^###\s+").expect("valid heading regex"));

/// Agent implementation that talks to the OpenAI HTTP API.
#[derive(Clone)]
pub struct OpenAIChatAgent {
    client: Client,
    endpoint: String,
    api_key: String,
    model: String,
}

impl OpenAIChatAgent {
    /// Creates a new agent with the provided API key and the default model.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: DEFAULT_CHAT_ENDPOINT.to_string(),
            api_key: api_key.into(),
            model: DEFAULT_CHAT_MODEL.to_string(),
        }
    }

    /// Creates an agent from `[chat]` settings.
    pub fn from_config(api_key: impl Into<String>, config: &ChatConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AdvisorError::config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            api_key: api_key.into(),
            model: config.model.clone(),
        })
    }

    /// Overrides the model after construction.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Overrides the endpoint URL (proxies, tests).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    async fn send_request(&self, body: &ChatCompletionRequest) -> Result<String> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|err| {
                AdvisorError::remote(SERVICE, None, format!("OpenAI API request failed: {err}"))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read OpenAI error body".to_string());
            return Err(map_http_error(status, body_text));
        }

        let parsed: ChatCompletionResponse = response.json().await.map_err(|err| {
            AdvisorError::remote(SERVICE, None, format!("Failed to parse OpenAI response: {err}"))
        })?;

        extract_text_response(parsed)
    }
}

#[async_trait]
impl ChatCompletionService for OpenAIChatAgent {
    async fn complete(&self, request: ChatRequest) -> Result<String> {
        let mut messages = Vec::with_capacity(request.history.len() + 2);
        messages.push(ChatMessage {
            role: "system".to_string(),
            content: request.system,
        });
        messages.extend(request.history.into_iter().map(|turn| ChatMessage {
            role: turn.role.as_str().to_string(),
            content: turn.content,
        }));
        messages.push(ChatMessage {
            role: "user".to_string(),
            content: request.user_message,
        });

        let body = ChatCompletionRequest {
            model: self.model.clone(),
            messages,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        };

        tracing::debug!(
            "[OpenAI] Sending {} messages to {}",
            body.messages.len(),
            self.model
        );
        let raw = self.send_request(&body).await?;
        Ok(clean_markdown_formatting(&raw))
    }
}

/// Strips `**bold**` markers and leading `###` heading markers.
pub fn clean_markdown_formatting(text: &str) -> String {
    let cleaned = BOLD.replace_all(text, "$1");
    HEADING.replace_all(&cleaned, "").into_owned()
}

#[derive(Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

fn extract_text_response(response: ChatCompletionResponse) -> Result<String> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| {
            AdvisorError::remote(SERVICE, None, "OpenAI API returned no content in the response")
        })
}

fn map_http_error(status: StatusCode, body: String) -> AdvisorError {
    let message = serde_json::from_str::<ErrorResponse>(&body)
        .map(|wrapper| wrapper.error.message)
        .unwrap_or(body);

    AdvisorError::remote(SERVICE, Some(status.as_u16()), message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use advisor_core::conversation::Turn;
    use httpmock::prelude::*;
    use serde_json::json;

    #[test]
    fn markdown_cleanup_removes_bold_and_headings() {
        let raw = "### Morning\nUse **CeraVe Cleanser** then **SPF**.\n  ### not a heading";
        assert_eq!(
            clean_markdown_formatting(raw),
            "Morning\nUse CeraVe Cleanser then SPF.\n  ### not a heading"
        );
    }

    #[tokio::test]
    async fn sends_system_history_and_user_message_in_order() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/v1/chat/completions")
                    .header("authorization", "Bearer sk-test")
                    .json_body(json!({
                        "model": "gpt-4o",
                        "messages": [
                            {"role": "system", "content": "be helpful"},
                            {"role": "assistant", "content": "welcome"},
                            {"role": "user", "content": "hi"}
                        ],
                        "max_tokens": 1000,
                        "temperature": 0.7
                    }));
                then.status(200).json_body(json!({
                    "choices": [{"message": {"role": "assistant", "content": "**Hello** there"}}]
                }));
            })
            .await;

        let agent =
            OpenAIChatAgent::new("sk-test").with_endpoint(server.url("/v1/chat/completions"));
        let request =
            ChatRequest::new("be helpful", "hi").with_history(vec![Turn::assistant("welcome")]);

        let reply = agent.complete(request).await.unwrap();

        mock.assert_async().await;
        assert_eq!(reply, "Hello there");
    }

    #[tokio::test]
    async fn non_success_status_is_a_remote_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/v1/chat/completions");
                then.status(429).json_body(json!({
                    "error": {"message": "Rate limit reached", "type": "requests"}
                }));
            })
            .await;

        let agent =
            OpenAIChatAgent::new("sk-test").with_endpoint(server.url("/v1/chat/completions"));
        let err = agent.complete(ChatRequest::new("s", "u")).await.unwrap_err();

        match err {
            AdvisorError::RemoteService { status, message, .. } => {
                assert_eq!(status, Some(429));
                assert_eq!(message, "Rate limit reached");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn empty_choices_are_a_remote_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST);
                then.status(200).json_body(json!({"choices": []}));
            })
            .await;

        let agent = OpenAIChatAgent::new("k").with_endpoint(server.url("/"));
        assert!(agent.complete(ChatRequest::new("s", "u")).await.unwrap_err().is_remote());
    }
}
