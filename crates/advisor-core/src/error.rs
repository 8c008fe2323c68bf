//! Error types for the advisor.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for the entire advisor workspace.
///
/// The variants mirror how each failure is handled:
/// - `CatalogUnavailable` is surfaced to the user
/// - `Persistence` is always recovered locally (logged, treated as a no-op)
/// - `RemoteService` covers chat and web search failures
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum AdvisorError {
    /// The product catalog could not be read or parsed
    #[error("Catalog unavailable: {0}")]
    CatalogUnavailable(String),

    /// Durable storage read/write failed
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// A remote HTTP service (chat completion, web search) failed
    #[error("Remote service error: {service}{} - {message}", status_suffix(.status))]
    RemoteService {
        service: String,
        status: Option<u16>,
        message: String,
    },

    /// Entity not found error with type information
    #[error("Entity not found: {entity_type} '{id}'")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// Rejected caller input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "TOML", "JSON", etc.
        message: String,
    },

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AdvisorError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a CatalogUnavailable error
    pub fn catalog_unavailable(message: impl Into<String>) -> Self {
        Self::CatalogUnavailable(message.into())
    }

    /// Creates a Persistence error
    pub fn persistence(message: impl Into<String>) -> Self {
        Self::Persistence(message.into())
    }

    /// Creates a RemoteService error
    pub fn remote(
        service: impl Into<String>,
        status: Option<u16>,
        message: impl Into<String>,
    ) -> Self {
        Self::RemoteService {
            service: service.into(),
            status,
            message: message.into(),
        }
    }

    /// Creates a NotFound error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates an InvalidInput error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is a CatalogUnavailable error
    pub fn is_catalog_unavailable(&self) -> bool {
        matches!(self, Self::CatalogUnavailable(_))
    }

    /// Check if this is a Persistence error
    pub fn is_persistence(&self) -> bool {
        matches!(self, Self::Persistence(_))
    }

    /// Check if this is a RemoteService error
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::RemoteService { .. })
    }

    /// Check if this is a NotFound error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is an InvalidInput error
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for AdvisorError {
    fn from(err: std::io::Error) -> Self {
        Self::io(format!("{} (kind: {:?})", err, err.kind()))
    }
}

impl From<serde_json::Error> for AdvisorError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for AdvisorError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<reqwest::Error> for AdvisorError {
    fn from(err: reqwest::Error) -> Self {
        Self::RemoteService {
            service: err
                .url()
                .and_then(|url| url.host_str().map(str::to_string))
                .unwrap_or_else(|| "http".to_string()),
            status: err.status().map(|status| status.as_u16()),
            message: err.to_string(),
        }
    }
}

/// Conversion from anyhow::Error (for collaborators that report through anyhow)
impl From<anyhow::Error> for AdvisorError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

fn status_suffix(status: &Option<u16>) -> String {
    status
        .map(|code| format!(" (status {code})"))
        .unwrap_or_default()
}

/// A type alias for `Result<T, AdvisorError>`.
pub type Result<T> = std::result::Result<T, AdvisorError>;
