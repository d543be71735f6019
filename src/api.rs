//! HTTP API for deckbot

mod handlers;
mod types;

pub use handlers::create_router;

use crate::deck::DeckWriter;
use crate::llm::ModelRegistry;
use crate::runtime::SessionManager;
use std::path::PathBuf;
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<SessionManager>,
    pub llm_registry: Arc<ModelRegistry>,
    /// Where the shared deck artifact is written
    pub deck_path: PathBuf,
}

impl AppState {
    pub fn new(
        sessions: Arc<SessionManager>,
        llm_registry: Arc<ModelRegistry>,
        deck: &DeckWriter,
    ) -> Self {
        Self {
            sessions,
            llm_registry,
            deck_path: deck.output_path().to_path_buf(),
        }
    }
}
