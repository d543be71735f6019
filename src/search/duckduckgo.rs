//! DuckDuckGo Instant Answer provider
//!
//! The Instant Answer API needs no key. It returns an abstract plus a tree
//! of related topics rather than a ranked result list; both are flattened
//! into hits here.

use super::{RawHit, SearchError, SearchProvider};
use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

const DDG_API_URL: &str = "https://api.duckduckgo.com/";
const USER_AGENT: &str = concat!("deckbot/", env!("CARGO_PKG_VERSION"));

/// Matches the anchor text in a related topic's `Result` HTML
const ANCHOR_PATTERN: &str = r"<a\s[^>]*>([^<]+)</a>";

pub struct DuckDuckGoProvider {
    client: Client,
    base_url: String,
    anchor: Regex,
}

impl DuckDuckGoProvider {
    pub fn new(request_timeout: Duration) -> Result<Self, SearchError> {
        Self::with_base_url(DDG_API_URL, request_timeout)
    }

    pub fn with_base_url(base_url: &str, request_timeout: Duration) -> Result<Self, SearchError> {
        let client = Client::builder()
            .timeout(request_timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| SearchError::Config(format!("HTTP client: {e}")))?;
        let anchor = Regex::new(ANCHOR_PATTERN)
            .map_err(|e| SearchError::Config(format!("anchor pattern: {e}")))?;
        Ok(Self {
            client,
            base_url: base_url.to_string(),
            anchor,
        })
    }

    /// Flatten an Instant Answer document into hits, abstract first
    fn parse_instant_answer(&self, data: &Value) -> Vec<RawHit> {
        let mut hits = Vec::new();

        if let Some(text) = non_empty_str(&data["AbstractText"]) {
            hits.push(RawHit {
                title: non_empty_str(&data["Heading"]).map(ToString::to_string),
                body: Some(text.to_string()),
                href: non_empty_str(&data["AbstractURL"]).map(ToString::to_string),
            });
        }

        if let Some(definition) = non_empty_str(&data["Definition"]) {
            hits.push(RawHit {
                title: Some(format!(
                    "Definition ({})",
                    data["DefinitionSource"].as_str().unwrap_or("Unknown")
                )),
                body: Some(definition.to_string()),
                href: non_empty_str(&data["DefinitionURL"]).map(ToString::to_string),
            });
        }

        if let Some(topics) = data["RelatedTopics"].as_array() {
            self.collect_topics(topics, &mut hits);
        }

        hits
    }

    fn collect_topics(&self, topics: &[Value], hits: &mut Vec<RawHit>) {
        for topic in topics {
            // Grouped topics nest their entries under "Topics"
            if let Some(nested) = topic["Topics"].as_array() {
                self.collect_topics(nested, hits);
                continue;
            }
            let Some(text) = non_empty_str(&topic["Text"]) else {
                continue;
            };
            let title = topic["Result"]
                .as_str()
                .and_then(|html| self.anchor.captures(html))
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str().to_string());
            hits.push(RawHit {
                title,
                body: Some(text.to_string()),
                href: topic["FirstURL"].as_str().map(ToString::to_string),
            });
        }
    }
}

fn non_empty_str(value: &Value) -> Option<&str> {
    value.as_str().filter(|s| !s.trim().is_empty())
}

#[async_trait]
impl SearchProvider for DuckDuckGoProvider {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<RawHit>, SearchError> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("q", query),
                ("format", "json"),
                ("no_html", "1"),
                ("skip_disambig", "1"),
            ])
            .send()
            .await
            .map_err(|e| SearchError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::Status(status.as_u16()));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| SearchError::Parse(e.to_string()))?;

        let mut hits = self.parse_instant_answer(&body);
        hits.truncate(max_results);
        Ok(hits)
    }

    fn name(&self) -> &str {
        "duckduckgo"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn provider() -> DuckDuckGoProvider {
        DuckDuckGoProvider::new(Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_parse_abstract_and_topics() {
        let data = json!({
            "Heading": "Rust (programming language)",
            "AbstractText": "Rust is a general-purpose programming language.",
            "AbstractURL": "https://en.wikipedia.org/wiki/Rust_(programming_language)",
            "Definition": "",
            "RelatedTopics": [
                {
                    "Text": "Cargo - The Rust package manager.",
                    "FirstURL": "https://duckduckgo.com/Cargo",
                    "Result": "<a href=\"https://duckduckgo.com/Cargo\">Cargo</a> - The Rust package manager."
                },
                {
                    "Name": "Tools",
                    "Topics": [
                        {
                            "Text": "Clippy lints.",
                            "FirstURL": "https://duckduckgo.com/Clippy",
                            "Result": "<a href=\"https://duckduckgo.com/Clippy\">Clippy</a> lints."
                        }
                    ]
                }
            ]
        });

        let hits = provider().parse_instant_answer(&data);
        assert_eq!(hits.len(), 3);
        assert_eq!(hits[0].title.as_deref(), Some("Rust (programming language)"));
        assert_eq!(hits[1].title.as_deref(), Some("Cargo"));
        assert_eq!(hits[2].title.as_deref(), Some("Clippy"));
        assert_eq!(hits[2].href.as_deref(), Some("https://duckduckgo.com/Clippy"));
    }

    #[test]
    fn test_parse_topic_without_anchor_has_no_title() {
        let data = json!({
            "RelatedTopics": [{ "Text": "Plain text topic", "FirstURL": "https://x.test" }]
        });
        let hits = provider().parse_instant_answer(&data);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, None);
    }

    #[test]
    fn test_parse_empty_document() {
        assert!(provider().parse_instant_answer(&json!({})).is_empty());
    }
}
