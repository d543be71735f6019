//! Mock implementations for testing
//!
//! These mocks enable integration testing without real I/O.

use super::traits::*;
use super::{Capabilities, SessionManager};
use crate::deck::DeckWriter;
use crate::llm::LlmError;
use crate::search::{RawHit, SearchError, SearchGateway, SearchProvider, SearchResult};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;

// ============================================================================
// Mock Chat Client
// ============================================================================

/// Mock chat client that returns queued replies
#[derive(Default)]
pub struct MockChatClient {
    replies: Mutex<VecDeque<Result<String, LlmError>>>,
    /// Record of all messages sent
    pub messages: Mutex<Vec<String>>,
}

impl MockChatClient {
    pub fn queue_reply(&self, text: impl Into<String>) {
        self.replies.lock().unwrap().push_back(Ok(text.into()));
    }

    pub fn queue_error(&self, error: LlmError) {
        self.replies.lock().unwrap().push_back(Err(error));
    }
}

#[async_trait]
impl ChatClient for MockChatClient {
    async fn chat(&self, message: &str) -> Result<String, LlmError> {
        self.messages.lock().unwrap().push(message.to_string());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(LlmError::network("No mock response queued")))
    }
}

// ============================================================================
// Mock Search Provider
// ============================================================================

/// Mock provider with queued outcomes; an empty queue yields no hits
#[derive(Default)]
pub struct MockSearchProvider {
    outcomes: Mutex<VecDeque<Result<Vec<RawHit>, SearchError>>>,
    queries: Mutex<Vec<String>>,
}

impl MockSearchProvider {
    pub fn queue_hits(&self, hits: Vec<RawHit>) {
        self.outcomes.lock().unwrap().push_back(Ok(hits));
    }

    pub fn queue_error(&self, error: SearchError) {
        self.outcomes.lock().unwrap().push_back(Err(error));
    }

    pub fn recorded_queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl SearchProvider for MockSearchProvider {
    async fn search(&self, query: &str, _max_results: usize) -> Result<Vec<RawHit>, SearchError> {
        self.queries.lock().unwrap().push(query.to_string());
        self.outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))
    }

    fn name(&self) -> &str {
        "mock"
    }
}

/// A complete provider record titled `title`
pub fn hit(title: &str) -> RawHit {
    RawHit {
        title: Some(title.to_string()),
        body: Some(format!("About {title}")),
        href: Some(format!("https://example.com/{title}")),
    }
}

// ============================================================================
// Mock Summarizer
// ============================================================================

/// Summarizer returning a fixed text
pub struct MockSummarizer {
    summary: Mutex<String>,
    calls: Mutex<Vec<(String, Vec<SearchResult>)>>,
}

impl Default for MockSummarizer {
    fn default() -> Self {
        Self {
            summary: Mutex::new("- mock point".to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }
}

impl MockSummarizer {
    pub fn set_summary(&self, summary: impl Into<String>) {
        *self.summary.lock().unwrap() = summary.into();
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl Summarizer for MockSummarizer {
    async fn summarize(&self, query: &str, results: &[SearchResult]) -> String {
        self.calls
            .lock()
            .unwrap()
            .push((query.to_string(), results.to_vec()));
        self.summary.lock().unwrap().clone()
    }
}

// ============================================================================
// Harness
// ============================================================================

/// A session manager wired to mocks and a temporary deck path
pub struct TestHarness {
    pub manager: Arc<SessionManager>,
    pub chat: Arc<MockChatClient>,
    pub search: Arc<MockSearchProvider>,
    pub summarizer: Arc<MockSummarizer>,
    pub store: Arc<MemorySessionStore>,
    pub deck_path: PathBuf,
    _dir: TempDir,
}

impl TestHarness {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let deck_path = dir.path().join("outputs").join("presentation.pptx");
        Self::build(dir, deck_path)
    }

    /// Deck path already taken by a directory, so every write fails
    pub fn with_unwritable_deck() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let deck_path = dir.path().join("presentation.pptx");
        std::fs::create_dir(&deck_path).unwrap();
        Self::build(dir, deck_path)
    }

    fn build(dir: TempDir, deck_path: PathBuf) -> Self {
        let chat = Arc::new(MockChatClient::default());
        let search = Arc::new(MockSearchProvider::default());
        let summarizer = Arc::new(MockSummarizer::default());
        let store = Arc::new(MemorySessionStore::new());

        let capabilities = Capabilities {
            chat: chat.clone(),
            search: Arc::new(SearchGateway::new(
                search.clone(),
                5,
                Duration::from_secs(5),
            )),
            summarizer: summarizer.clone(),
            deck: Arc::new(DeckWriter::new(&deck_path)),
        };
        let manager = Arc::new(SessionManager::new(capabilities, store.clone()));

        Self {
            manager,
            chat,
            search,
            summarizer,
            store,
            deck_path,
            _dir: dir,
        }
    }
}
