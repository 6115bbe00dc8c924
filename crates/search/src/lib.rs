//! Brave Search collaborator.
//!
//! Calls the Brave web search API and returns a formatted, human-readable
//! results block suitable for embedding in a prompt. The session loop treats
//! this as an opaque, possibly-failing dependency: a missing credential and a
//! transport failure are surfaced as distinct conditions and no retry is
//! performed.

use async_trait::async_trait;
use ember_core::error::SearchError;
use ember_core::search::SearchProvider;
use std::time::Duration;
use tracing::debug;

const API_URL: &str = "https://api.search.brave.com/res/v1/web/search";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Web search over the Brave Search API.
pub struct BraveSearch {
    api_key: Option<String>,
    client: reqwest::Client,
}

impl BraveSearch {
    /// Create a client. The credential stays optional until a search is
    /// actually attempted.
    pub fn new(api_key: Option<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to create HTTP client");

        Self { api_key, client }
    }
}

#[async_trait]
impl SearchProvider for BraveSearch {
    fn name(&self) -> &str {
        "brave"
    }

    async fn search(
        &self,
        query: &str,
        max_results: usize,
    ) -> std::result::Result<String, SearchError> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            SearchError::MissingCredential(
                "BRAVE_API_KEY is not set; add it to your environment or to \
                 the [search] section of config.toml"
                    .into(),
            )
        })?;

        debug!(query = %query, "Sending Brave search request");

        let count = max_results.min(20).to_string();
        let response = self
            .client
            .get(API_URL)
            .query(&[
                ("q", query),
                ("count", count.as_str()),
                ("safesearch", "moderate"),
            ])
            .header("Accept", "application/json")
            .header("X-Subscription-Token", api_key)
            .send()
            .await
            .map_err(|e| SearchError::Transport {
                status: None,
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SearchError::Transport {
                status: Some(status.as_u16()),
                reason: body,
            });
        }

        let payload: serde_json::Value =
            response.json().await.map_err(|e| SearchError::Transport {
                status: None,
                reason: format!("invalid response body: {e}"),
            })?;

        Ok(format_results(&payload, max_results))
    }
}

/// Render the ranked results as a numbered text block.
fn format_results(payload: &serde_json::Value, max_results: usize) -> String {
    let results = payload["web"]["results"].as_array();

    let Some(results) = results.filter(|r| !r.is_empty()) else {
        return "No results found.".into();
    };

    let mut lines: Vec<String> = Vec::new();
    for (i, result) in results.iter().take(max_results).enumerate() {
        let title = result["title"].as_str().unwrap_or("(no title)");
        let url = result["url"].as_str().unwrap_or("");
        let description = result["description"].as_str().unwrap_or("").trim();

        lines.push(format!("{}. {title}", i + 1));
        if !url.is_empty() {
            lines.push(format!("   URL: {url}"));
        }
        if !description.is_empty() {
            lines.push(format!("   {description}"));
        }
    }

    lines.join("\n")
}
