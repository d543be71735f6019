//! Events that can occur in a session

use crate::search::SearchResult;
use std::path::PathBuf;

/// How the user answers a set of search results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmAction {
    Confirm,
    Requery,
}

impl ConfirmAction {
    /// Parse a user-typed action, ignoring case and surrounding whitespace
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "ok" | "confirm" => Some(ConfirmAction::Confirm),
            "search_again" | "requery" => Some(ConfirmAction::Requery),
            _ => None,
        }
    }
}

/// Events that trigger state transitions
#[derive(Debug, Clone)]
pub enum Event {
    // User events
    UserMessage {
        text: String,
    },
    Confirm,
    Requery {
        query: Option<String>,
    },
    GenerateDeck,
    Reset,

    // Chat capability events
    ChatReply {
        user_message: String,
        text: String,
    },
    ChatFailed {
        message: String,
    },

    // Search capability events
    SearchComplete {
        query: String,
        results: Vec<SearchResult>,
    },

    // Summarizer capability events
    SummaryComplete {
        summary: String,
    },

    // Slide builder events
    DeckWritten {
        path: PathBuf,
        fallback: bool,
    },
    DeckFailed {
        message: String,
    },
}

impl Event {
    /// Build the user event for a confirmation request
    pub fn confirmation(action: ConfirmAction, new_query: Option<String>) -> Self {
        match action {
            ConfirmAction::Confirm => Event::Confirm,
            ConfirmAction::Requery => Event::Requery { query: new_query },
        }
    }

    /// Short name for logging
    pub fn kind(&self) -> &'static str {
        match self {
            Event::UserMessage { .. } => "user_message",
            Event::Confirm => "confirm",
            Event::Requery { .. } => "requery",
            Event::GenerateDeck => "generate_deck",
            Event::Reset => "reset",
            Event::ChatReply { .. } => "chat_reply",
            Event::ChatFailed { .. } => "chat_failed",
            Event::SearchComplete { .. } => "search_complete",
            Event::SummaryComplete { .. } => "summary_complete",
            Event::DeckWritten { .. } => "deck_written",
            Event::DeckFailed { .. } => "deck_failed",
        }
    }
}
