//! Effects produced by state transitions

use super::state::SessionState;
use crate::search::SearchResult;
use serde::Serialize;
use std::path::PathBuf;

/// What the caller of a session operation gets back
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reply {
    pub reply: String,
    pub step: SessionState,
    pub options: Vec<String>,
    pub deck_path: Option<PathBuf>,
}

impl Reply {
    pub fn new(reply: impl Into<String>, step: SessionState) -> Self {
        Self {
            reply: reply.into(),
            step,
            options: step.options(),
            deck_path: None,
        }
    }

    pub fn with_deck_path(mut self, path: PathBuf) -> Self {
        self.deck_path = Some(path);
        self
    }
}

/// Effects to be executed after state transition
#[derive(Debug, Clone)]
pub enum Effect {
    /// Ask the chat capability to answer a user message
    RequestChat { message: String },

    /// Run the search gateway
    RunSearch { query: String },

    /// Condense results into a summary
    Summarize {
        query: String,
        results: Vec<SearchResult>,
    },

    /// Render the summary into the deck artifact
    BuildDeck { summary: String },

    /// Save the session to the store
    PersistSession,

    /// Answer the pending session operation
    Respond(Reply),
}

impl Effect {
    pub fn respond(reply: impl Into<String>, step: SessionState) -> Self {
        Effect::Respond(Reply::new(reply, step))
    }
}
