//! Session state types

use crate::search::SearchResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// History
// ============================================================================

/// Who produced a history entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
}

/// Which capability produced an assistant entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolTag {
    Chat,
    Search,
    Summarizer,
    Deck,
}

/// One line of the conversation transcript
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub role: Role,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool: Option<ToolTag>,
    pub at: DateTime<Utc>,
}

impl HistoryEntry {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
            tool: None,
            at: Utc::now(),
        }
    }

    pub fn assistant(text: impl Into<String>, tool: ToolTag) -> Self {
        Self {
            role: Role::Assistant,
            text: text.into(),
            tool: Some(tool),
            at: Utc::now(),
        }
    }
}

// ============================================================================
// Session State
// ============================================================================

/// Where a session is in the research pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// Plain chat, nothing pending
    #[default]
    Idle,

    /// Search call in flight (transient)
    Searching,

    /// Results shown, waiting for the user to confirm or requery
    AwaitingConfirm,

    /// Summary stored, a deck may be generated
    Summarized,
}

impl SessionState {
    pub fn as_str(self) -> &'static str {
        match self {
            SessionState::Idle => "idle",
            SessionState::Searching => "searching",
            SessionState::AwaitingConfirm => "awaiting_confirm",
            SessionState::Summarized => "summarized",
        }
    }

    /// Next choices offered to the user in this state
    pub fn options(self) -> Vec<String> {
        let options: &[&str] = match self {
            SessionState::Idle => &["Ask me something", "Or request a search"],
            SessionState::Searching => &[],
            SessionState::AwaitingConfirm => {
                &["OK to confirm", "Or type a new query to search again"]
            }
            SessionState::Summarized => &["Generate slide deck"],
        };
        options.iter().map(ToString::to_string).collect()
    }
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything one conversation remembers between events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Session {
    pub history: Vec<HistoryEntry>,
    pub state: SessionState,
    pub last_query: String,
    pub last_results: Vec<SearchResult>,
    pub last_summary: String,
}

impl Session {
    /// Whether a confirm can proceed straight to summarization
    pub fn has_pending_results(&self) -> bool {
        !self.last_query.is_empty() && !self.last_results.is_empty()
    }

    pub fn push_user(&mut self, text: impl Into<String>) {
        self.history.push(HistoryEntry::user(text));
    }

    pub fn push_assistant(&mut self, text: impl Into<String>, tool: ToolTag) {
        self.history.push(HistoryEntry::assistant(text, tool));
    }
}
