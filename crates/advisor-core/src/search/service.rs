//! Web search service trait definition.

use async_trait::async_trait;

use crate::error::Result;
use crate::search::WebSearchResult;

/// Service for fetching live web results for a query.
#[async_trait]
pub trait WebSearchService: Send + Sync {
    /// Executes a search with the given (already brand-scoped) query.
    ///
    /// Implementations report transport and HTTP failures as
    /// `AdvisorError::RemoteService`; callers degrade those to no results.
    async fn search(&self, query: &str) -> Result<Vec<WebSearchResult>>;
}
