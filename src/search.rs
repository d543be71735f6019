//! Web search gateway
//!
//! Wraps a search provider behind a contract that never fails: provider
//! errors and timeouts become a single "Search error" result so a session
//! always has something to show and move forward with.

mod duckduckgo;

pub use duckduckgo::DuckDuckGoProvider;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::time::timeout;

/// Title used for the synthetic result that carries a failure
pub const SEARCH_ERROR_TITLE: &str = "Search error";
const DEFAULT_TITLE: &str = "No Title";
const DEFAULT_SNIPPET: &str = "No snippet";

/// One normalized search hit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub title: String,
    pub snippet: String,
    pub link: String,
}

impl SearchResult {
    /// Normalize a provider record, filling in defaults for missing fields
    pub fn from_raw(raw: RawHit) -> Self {
        Self {
            title: non_blank(raw.title).unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            snippet: non_blank(raw.body).unwrap_or_else(|| DEFAULT_SNIPPET.to_string()),
            link: non_blank(raw.href).unwrap_or_default(),
        }
    }

    /// The synthetic result reported in place of a failed search
    pub fn error(description: impl Into<String>) -> Self {
        let description = description.into();
        Self {
            title: SEARCH_ERROR_TITLE.to_string(),
            snippet: if description.trim().is_empty() {
                "unknown search failure".to_string()
            } else {
                description
            },
            link: String::new(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.title == SEARCH_ERROR_TITLE && self.link.is_empty()
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// A result record as a provider hands it over, any field may be absent
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawHit {
    pub title: Option<String>,
    pub body: Option<String>,
    pub href: Option<String>,
}

/// Search provider failure
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Search request failed: {0}")]
    Request(String),
    #[error("Search API returned HTTP {0}")]
    Status(u16),
    #[error("Failed to parse search results: {0}")]
    Parse(String),
    #[error("Search provider misconfigured: {0}")]
    Config(String),
}

/// Backend that turns a query into raw hits
#[async_trait]
pub trait SearchProvider: Send + Sync {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<RawHit>, SearchError>;

    /// Provider name for logging
    fn name(&self) -> &str;
}

#[async_trait]
impl<T: SearchProvider + ?Sized> SearchProvider for Arc<T> {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<RawHit>, SearchError> {
        (**self).search(query, max_results).await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Failure-tolerant front for a [`SearchProvider`]
pub struct SearchGateway {
    provider: Arc<dyn SearchProvider>,
    max_results: usize,
    timeout: Duration,
}

impl SearchGateway {
    pub fn new(provider: Arc<dyn SearchProvider>, max_results: usize, timeout: Duration) -> Self {
        Self {
            provider,
            max_results,
            timeout,
        }
    }

    /// Search and normalize; never fails
    pub async fn search(&self, query: &str) -> Vec<SearchResult> {
        let start = Instant::now();
        let outcome = timeout(self.timeout, self.provider.search(query, self.max_results)).await;
        let duration_ms = start.elapsed().as_millis();

        match outcome {
            Ok(Ok(hits)) => {
                let results: Vec<SearchResult> = hits
                    .into_iter()
                    .take(self.max_results)
                    .map(SearchResult::from_raw)
                    .collect();
                tracing::info!(
                    provider = %self.provider.name(),
                    query = %query,
                    count = results.len(),
                    duration_ms = %duration_ms,
                    "Search completed"
                );
                results
            }
            Ok(Err(e)) => {
                tracing::warn!(
                    provider = %self.provider.name(),
                    query = %query,
                    error = %e,
                    duration_ms = %duration_ms,
                    "Search failed"
                );
                vec![SearchResult::error(e.to_string())]
            }
            Err(_) => {
                tracing::warn!(
                    provider = %self.provider.name(),
                    query = %query,
                    timeout_secs = self.timeout.as_secs(),
                    "Search timed out"
                );
                vec![SearchResult::error(format!(
                    "Search timed out after {} seconds",
                    self.timeout.as_secs()
                ))]
            }
        }
    }
}

/// Render results as the numbered list shown to the user
pub fn format_results_for_chat(results: &[SearchResult]) -> String {
    if results.is_empty() {
        return "No results found.".to_string();
    }
    results
        .iter()
        .enumerate()
        .map(|(i, r)| format!("{}. {}\n   {}\n   {}", i + 1, r.title, r.snippet, r.link))
        .collect::<Vec<_>>()
        .join("\n\n")
}
