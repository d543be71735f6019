//! deckbot - chat-driven research to slide deck service
//!
//! A session state machine sequences chat, web search, confirmation,
//! summarization and slide deck generation behind a small HTTP API.

mod api;
mod config;
mod deck;
mod llm;
mod prompts;
mod runtime;
mod search;
mod state_machine;

use api::{create_router, AppState};
use config::AppConfig;
use deck::DeckWriter;
use llm::ModelRegistry;
use runtime::{Capabilities, LlmChatClient, LlmSummarizer, MemorySessionStore, SessionManager};
use search::{DuckDuckGoProvider, SearchGateway};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A missing .env file is fine
    let dotenv = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "deckbot=info,tower_http=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    if let Ok(path) = dotenv {
        tracing::info!(path = %path.display(), "Loaded environment file");
    }

    // Configuration
    let config = AppConfig::from_env();

    // Initialize LLM registry
    let llm_registry = Arc::new(ModelRegistry::new(&config.llm));
    if llm_registry.has_provider() {
        tracing::info!(
            models = ?llm_registry.available_models(),
            default = %llm_registry.default_model_id(),
            "LLM registry initialized"
        );
    } else {
        tracing::warn!(
            "No LLM API keys configured. Set GEMINI_API_KEY, ANTHROPIC_API_KEY or LLM_GATEWAY. Using offline echo model."
        );
    }
    let llm = llm_registry.default_service();

    // Capabilities shared by all sessions
    let provider = DuckDuckGoProvider::new(config.search_timeout)?;
    let deck = Arc::new(DeckWriter::new(&config.deck_output_path));
    let capabilities = Capabilities {
        chat: Arc::new(LlmChatClient::new(llm.clone())),
        search: Arc::new(SearchGateway::new(
            Arc::new(provider),
            config.search_max_results,
            config.search_timeout,
        )),
        summarizer: Arc::new(LlmSummarizer::new(llm)),
        deck: deck.clone(),
    };
    let sessions = Arc::new(SessionManager::new(
        capabilities,
        Arc::new(MemorySessionStore::new()),
    ));

    let state = AppState::new(sessions, llm_registry, &deck);

    // Create router
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = create_router(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!(
        deck_path = %config.deck_output_path.display(),
        search_max_results = config.search_max_results,
        search_timeout_secs = config.search_timeout.as_secs(),
        "deckbot listening on {}",
        addr
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
