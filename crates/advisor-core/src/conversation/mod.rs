//! Conversation history and routine context.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::product::Product;

/// History length above which compaction kicks in.
pub const MAX_HISTORY_TURNS: usize = 10;

/// Represents the author of a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    /// Message from the user.
    User,
    /// Message from the assistant, including synthetic routine turns.
    Assistant,
}

impl TurnRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            TurnRole::User => "user",
            TurnRole::Assistant => "assistant",
        }
    }
}

/// A single message in the conversation history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: TurnRole,
    pub content: String,
}

impl Turn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::Assistant,
            content: content.into(),
        }
    }
}

/// Context fragments describing the session, injected into the next request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextSuffix {
    /// Names the selected products, or notes that none are selected.
    pub selection: String,
    /// Present only when a routine has been generated.
    pub routine: Option<String>,
}

impl fmt::Display for ContextSuffix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\n\n{}", self.selection)?;
        if let Some(routine) = &self.routine {
            write!(f, "\n\n{}", routine)?;
        }
        Ok(())
    }
}

/// Rolling chat history plus the most recently generated routine.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversationContext {
    history: Vec<Turn>,
    generated_routine: Option<String>,
}

impl ConversationContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn history(&self) -> &[Turn] {
        &self.history
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    pub fn generated_routine(&self) -> Option<&str> {
        self.generated_routine.as_deref()
    }

    pub fn append_user_turn(&mut self, text: impl Into<String>) {
        self.push(Turn::user(text));
    }

    pub fn append_assistant_turn(&mut self, text: impl Into<String>) {
        self.push(Turn::assistant(text));
    }

    /// Replaces the routine slot and records it as an assistant turn.
    pub fn set_generated_routine(&mut self, text: impl Into<String>) {
        let text = text.into();
        self.push(Turn::assistant(format!(
            "Here is your personalized routine: {text}"
        )));
        self.generated_routine = Some(text);
    }

    /// Describes the current selection and routine availability.
    pub fn build_context_suffix(&self, selection: &[Product]) -> ContextSuffix {
        let selection = if selection.is_empty() {
            "The customer has not selected any products yet.".to_string()
        } else {
            let names: Vec<String> = selection.iter().map(Product::label).collect();
            format!(
                "The customer has selected these products: {}.",
                names.join(", ")
            )
        };

        let routine = self.generated_routine.as_ref().map(|_| {
            "A personalized routine has been generated for the customer. \
             They may ask follow-up questions about this routine."
                .to_string()
        });

        ContextSuffix { selection, routine }
    }

    fn push(&mut self, turn: Turn) {
        self.history.push(turn);
        self.compact();
    }

    // Keeps the first turn (the welcome message) and the most recent ones.
    // Pairs are not preserved: an assistant reply can lose its user turn.
    fn compact(&mut self) {
        if self.history.len() > MAX_HISTORY_TURNS {
            let overflow = self.history.len() - (MAX_HISTORY_TURNS - 1);
            self.history.drain(1..overflow);
        }
    }
}
