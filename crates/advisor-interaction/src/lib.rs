//! Remote service agents (OpenAI chat completions, Brave web search) and
//! the prompt templates they are fed.

pub mod brave_search_agent;
pub mod openai_chat_agent;
pub mod prompts;

pub use brave_search_agent::BraveSearchAgent;
pub use openai_chat_agent::{OpenAIChatAgent, clean_markdown_formatting};
