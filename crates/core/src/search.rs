//! SearchProvider trait — the abstraction over the web search collaborator.
//!
//! Given a query string, a provider returns a formatted multi-line text block
//! of ranked results (title, URL, description) suitable for embedding in a
//! prompt, or fails with a distinguishable missing-credential vs transport
//! condition.

use async_trait::async_trait;

use crate::error::SearchError;

/// The web search collaborator.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// A human-readable name for this provider (e.g., "brave").
    fn name(&self) -> &str;

    /// Search the web and return a formatted results block.
    async fn search(
        &self,
        query: &str,
        max_results: usize,
    ) -> std::result::Result<String, SearchError>;
}
