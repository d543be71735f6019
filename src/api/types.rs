//! API request and response types

use crate::state_machine::{HistoryEntry, Session, SessionState};
use crate::search::SearchResult;
use serde::{Deserialize, Serialize};

/// Request to send a chat message
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
}

/// Answer to a set of search results
#[derive(Debug, Deserialize)]
pub struct ConfirmRequest {
    /// `ok` or `search_again`, in any case
    #[serde(default = "default_action")]
    pub action: String,
    #[serde(default)]
    pub new_query: Option<String>,
}

fn default_action() -> String {
    "ok".to_string()
}

/// Response for session creation
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateSessionResponse {
    pub session_id: String,
}

/// Full view of a session
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub session_id: String,
    pub state: SessionState,
    pub options: Vec<String>,
    pub history: Vec<HistoryEntry>,
    pub last_query: String,
    pub last_results: Vec<SearchResult>,
    pub last_summary: String,
}

impl SessionResponse {
    pub fn new(session_id: String, session: Session) -> Self {
        Self {
            session_id,
            state: session.state,
            options: session.state.options(),
            history: session.history,
            last_query: session.last_query,
            last_results: session.last_results,
            last_summary: session.last_summary,
        }
    }
}

/// Generic success response
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// Response for reset
#[derive(Debug, Serialize)]
pub struct ResetResponse {
    pub message: String,
}

/// Model information with metadata
#[derive(Debug, Serialize)]
pub struct ModelInfo {
    pub id: String,
    pub provider: String,
    pub description: String,
}

/// Response for model list
#[derive(Debug, Serialize)]
pub struct ModelsResponse {
    pub models: Vec<ModelInfo>,
    pub default: String,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}
