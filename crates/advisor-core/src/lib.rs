//! Domain layer of the beauty advisor.
//!
//! Holds the selection and conversation state machine, the heuristics that
//! gate web search and map replies back to products, and the traits through
//! which the outer layers plug in storage, the catalog source and remote
//! services.

pub mod chat;
pub mod config;
pub mod conversation;
pub mod error;
pub mod product;
pub mod recommendation;
pub mod search;
pub mod selection;
pub mod session;
pub mod storage;
pub mod theme;

// Re-export common error type
pub use error::{AdvisorError, Result};
