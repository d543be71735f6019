//! Trait abstractions for runtime I/O
//!
//! These traits enable testing the executor with mock implementations.

use crate::llm::{LlmError, LlmRequest, LlmService, RequestPurpose};
use crate::prompts::{summarize_prompt, CHAT_SYSTEM_PROMPT, SUMMARIZER_SYSTEM_PROMPT};
use crate::search::SearchResult;
use crate::state_machine::Session;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Returned when the model produces no text at all
pub const EMPTY_SUMMARY: &str = "No summary could be generated from these results.";

const SUMMARY_MAX_TOKENS: u32 = 1024;

/// Conversational capability
#[async_trait]
pub trait ChatClient: Send + Sync {
    async fn chat(&self, message: &str) -> Result<String, LlmError>;
}

/// Condenses search results; always yields text, failures included
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, query: &str, results: &[SearchResult]) -> String;
}

/// Storage for session state, keyed by session id
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn load(&self, session_id: &str) -> Result<Option<Session>, String>;

    async fn save(&self, session_id: &str, session: &Session) -> Result<(), String>;

    async fn remove(&self, session_id: &str) -> Result<(), String>;
}

// ============================================================================
// Arc implementations for trait objects
// ============================================================================

#[async_trait]
impl<T: ChatClient + ?Sized> ChatClient for Arc<T> {
    async fn chat(&self, message: &str) -> Result<String, LlmError> {
        (**self).chat(message).await
    }
}

#[async_trait]
impl<T: Summarizer + ?Sized> Summarizer for Arc<T> {
    async fn summarize(&self, query: &str, results: &[SearchResult]) -> String {
        (**self).summarize(query, results).await
    }
}

#[async_trait]
impl<T: SessionStore + ?Sized> SessionStore for Arc<T> {
    async fn load(&self, session_id: &str) -> Result<Option<Session>, String> {
        (**self).load(session_id).await
    }

    async fn save(&self, session_id: &str, session: &Session) -> Result<(), String> {
        (**self).save(session_id, session).await
    }

    async fn remove(&self, session_id: &str) -> Result<(), String> {
        (**self).remove(session_id).await
    }
}

// ============================================================================
// Production Adapters
// ============================================================================

/// Chat through an LLM service with the research-assistant prompt
pub struct LlmChatClient {
    llm: Arc<dyn LlmService>,
}

impl LlmChatClient {
    pub fn new(llm: Arc<dyn LlmService>) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl ChatClient for LlmChatClient {
    async fn chat(&self, message: &str) -> Result<String, LlmError> {
        let request = LlmRequest::single_turn(Some(CHAT_SYSTEM_PROMPT), message);
        let response = self.llm.complete(&request).await?;
        Ok(response.text)
    }
}

/// Summarize through an LLM service, reporting failures as the summary text
pub struct LlmSummarizer {
    llm: Arc<dyn LlmService>,
}

impl LlmSummarizer {
    pub fn new(llm: Arc<dyn LlmService>) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl Summarizer for LlmSummarizer {
    async fn summarize(&self, query: &str, results: &[SearchResult]) -> String {
        let request = LlmRequest::single_turn(
            Some(SUMMARIZER_SYSTEM_PROMPT),
            summarize_prompt(query, results),
        )
        .with_max_tokens(SUMMARY_MAX_TOKENS)
        .with_temperature(0.2)
        .with_purpose(RequestPurpose::Summary);

        match self.llm.complete(&request).await {
            Ok(response) if response.text.trim().is_empty() => EMPTY_SUMMARY.to_string(),
            Ok(response) => response.text.trim().to_string(),
            Err(e) => {
                tracing::warn!(query = %query, error = %e, "Summarization failed");
                format!("Summarization failed: {e}")
            }
        }
    }
}

/// In-memory session storage; sessions live as long as the process
#[derive(Default)]
pub struct MemorySessionStore {
    sessions: RwLock<HashMap<String, Session>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn load(&self, session_id: &str) -> Result<Option<Session>, String> {
        Ok(self.sessions.read().await.get(session_id).cloned())
    }

    async fn save(&self, session_id: &str, session: &Session) -> Result<(), String> {
        self.sessions
            .write()
            .await
            .insert(session_id.to_string(), session.clone());
        Ok(())
    }

    async fn remove(&self, session_id: &str) -> Result<(), String> {
        self.sessions.write().await.remove(session_id);
        Ok(())
    }
}
