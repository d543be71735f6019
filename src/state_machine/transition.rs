//! Pure state transition function
//!
//! Given the same session and event this always produces the same new
//! session and effects. Capability calls happen in the runtime, which feeds
//! their outcomes back in as events.

use super::directive::search_query;
use super::state::{Session, SessionState, ToolTag};
use super::{Effect, Event, Reply};
use crate::search::{format_results_for_chat, SearchResult};
use thiserror::Error;

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub session: Session,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(session: Session) -> Self {
        Self {
            session,
            effects: vec![],
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }
}

/// Errors that can occur during transition
///
/// Every variant except `InvalidTransition` is a usage error: the request is
/// rejected and the session is left exactly as it was.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransitionError {
    #[error("A search is already in progress for this session")]
    Busy,
    #[error("Empty message")]
    EmptyMessage,
    #[error("Nothing to confirm. Start with a chat search.")]
    NothingToConfirm,
    #[error("No previous query and no new query provided.")]
    NoQuery,
    #[error("No summary available. Confirm search first.")]
    NoSummary,
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),
}

impl TransitionError {
    pub fn is_usage_error(&self) -> bool {
        !matches!(self, TransitionError::InvalidTransition(_))
    }
}

/// Pure transition function
pub fn transition(session: &Session, event: Event) -> Result<TransitionResult, TransitionError> {
    let state = session.state;
    match (state, event) {
        // ============================================================
        // Reset (allowed from anywhere)
        // ============================================================
        (_, Event::Reset) => Ok(TransitionResult::new(Session::default())
            .with_effect(Effect::PersistSession)
            .with_effect(Effect::respond("Reset done", SessionState::Idle))),

        // ============================================================
        // User events while a search is in flight
        // ============================================================
        (
            SessionState::Searching,
            Event::UserMessage { .. }
            | Event::Confirm
            | Event::Requery { .. }
            | Event::GenerateDeck,
        ) => Err(TransitionError::Busy),

        // ============================================================
        // Chat round
        // ============================================================
        (_, Event::UserMessage { text }) => {
            let text = text.trim();
            if text.is_empty() {
                return Err(TransitionError::EmptyMessage);
            }
            let mut next = session.clone();
            next.push_user(text);
            Ok(TransitionResult::new(next)
                .with_effect(Effect::PersistSession)
                .with_effect(Effect::RequestChat {
                    message: text.to_string(),
                }))
        }

        (SessionState::Searching, Event::ChatReply { .. } | Event::ChatFailed { .. }) => {
            Err(invalid(state, "chat outcome"))
        }

        (_, Event::ChatReply { user_message, text }) => {
            let mut next = session.clone();
            match search_query(&text, &user_message) {
                Some(query) => Ok(begin_search(next, query)),
                None => {
                    next.push_assistant(text.clone(), ToolTag::Chat);
                    let step = next.state;
                    Ok(TransitionResult::new(next)
                        .with_effect(Effect::PersistSession)
                        .with_effect(Effect::respond(text, step)))
                }
            }
        }

        (_, Event::ChatFailed { message }) => {
            let mut next = session.clone();
            next.push_assistant(message.clone(), ToolTag::Chat);
            Ok(TransitionResult::new(next)
                .with_effect(Effect::PersistSession)
                .with_effect(Effect::respond(message, state)))
        }

        // ============================================================
        // Search round
        // ============================================================
        (SessionState::Searching, Event::SearchComplete { query, results }) => {
            let message = search_message(&query, &results);
            let mut next = session.clone();
            next.last_query = query;
            next.last_results = results;
            next.state = SessionState::AwaitingConfirm;
            next.push_assistant(message.clone(), ToolTag::Search);
            Ok(TransitionResult::new(next)
                .with_effect(Effect::PersistSession)
                .with_effect(Effect::respond(message, SessionState::AwaitingConfirm)))
        }

        (_, Event::Requery { query }) => {
            let new_query = query
                .as_deref()
                .map(str::trim)
                .filter(|q| !q.is_empty())
                .map(ToString::to_string);
            let resolved = new_query
                .clone()
                .unwrap_or_else(|| session.last_query.clone());
            if resolved.is_empty() {
                return Err(TransitionError::NoQuery);
            }
            let mut next = session.clone();
            next.push_user(new_query.unwrap_or_else(|| "[search again]".to_string()));
            Ok(begin_search(next, resolved))
        }

        // ============================================================
        // Confirmation and summary
        // ============================================================
        (_, Event::Confirm) => {
            if session.has_pending_results() {
                Ok(TransitionResult::new(session.clone()).with_effect(Effect::Summarize {
                    query: session.last_query.clone(),
                    results: session.last_results.clone(),
                }))
            } else if !session.last_query.is_empty() {
                let query = session.last_query.clone();
                Ok(begin_search(session.clone(), query))
            } else {
                Err(TransitionError::NothingToConfirm)
            }
        }

        (
            SessionState::AwaitingConfirm | SessionState::Summarized,
            Event::SummaryComplete { summary },
        ) => {
            let message = format!(
                "Summary for: {}\n\n{summary}\n\nIf you'd like a slide deck, ask me to generate it.",
                session.last_query
            );
            let mut next = session.clone();
            next.last_summary = summary;
            next.state = SessionState::Summarized;
            next.push_assistant(message.clone(), ToolTag::Summarizer);
            Ok(TransitionResult::new(next)
                .with_effect(Effect::PersistSession)
                .with_effect(Effect::respond(message, SessionState::Summarized)))
        }

        // ============================================================
        // Deck generation
        // ============================================================
        (_, Event::GenerateDeck) => {
            if session.last_summary.trim().is_empty() {
                return Err(TransitionError::NoSummary);
            }
            Ok(TransitionResult::new(session.clone()).with_effect(Effect::BuildDeck {
                summary: session.last_summary.clone(),
            }))
        }

        (SessionState::Summarized, Event::DeckWritten { path, fallback }) => {
            let mut next = session.clone();
            let note = if fallback { " (fallback layout)" } else { "" };
            next.push_assistant(
                format!("Slide deck generated{note}: {}", path.display()),
                ToolTag::Deck,
            );
            let reply = Reply::new(
                "Slide deck generated. You can download it now.",
                SessionState::Summarized,
            )
            .with_deck_path(path);
            Ok(TransitionResult::new(next)
                .with_effect(Effect::PersistSession)
                .with_effect(Effect::Respond(reply)))
        }

        (SessionState::Summarized, Event::DeckFailed { message }) => {
            let mut next = session.clone();
            next.push_assistant(message.clone(), ToolTag::Deck);
            Ok(TransitionResult::new(next)
                .with_effect(Effect::PersistSession)
                .with_effect(Effect::respond(message, SessionState::Summarized)))
        }

        // ============================================================
        // Anything else is a runtime bug
        // ============================================================
        (_, event) => Err(invalid(state, event.kind())),
    }
}

/// Enter `Searching` for a fresh round, dropping results from earlier rounds
fn begin_search(mut session: Session, query: String) -> TransitionResult {
    session.state = SessionState::Searching;
    session.last_query.clone_from(&query);
    session.last_results.clear();
    session.last_summary.clear();
    TransitionResult::new(session)
        .with_effect(Effect::PersistSession)
        .with_effect(Effect::RunSearch { query })
}

fn search_message(query: &str, results: &[SearchResult]) -> String {
    format!(
        "Top {} results for: {query}\n\n{}\n\nReply with 'OK' to confirm these results or type a new query to search again.",
        results.len(),
        format_results_for_chat(results)
    )
}

fn invalid(state: SessionState, what: &str) -> TransitionError {
    TransitionError::InvalidTransition(format!("{what} in state {state}"))
}
