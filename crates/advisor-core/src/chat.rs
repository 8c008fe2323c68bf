//! Chat completion service trait and request model.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::conversation::Turn;
use crate::error::Result;

/// Token budget for conversational replies.
pub const CHAT_MAX_TOKENS: u32 = 1000;

/// Token budget for routine generation.
pub const ROUTINE_MAX_TOKENS: u32 = 1200;

pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// One outbound chat completion request.
///
/// Sent as: system instructions, then `history` in order, then the new user
/// message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub system: String,
    pub history: Vec<Turn>,
    pub user_message: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl ChatRequest {
    pub fn new(system: impl Into<String>, user_message: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            history: Vec::new(),
            user_message: user_message.into(),
            max_tokens: CHAT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    pub fn with_history(mut self, history: Vec<Turn>) -> Self {
        self.history = history;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

/// A remote language model producing a single text completion.
#[async_trait]
pub trait ChatCompletionService: Send + Sync {
    /// Returns the completion text.
    ///
    /// Any non-success HTTP status is a hard failure
    /// (`AdvisorError::RemoteService`).
    async fn complete(&self, request: ChatRequest) -> Result<String>;
}
