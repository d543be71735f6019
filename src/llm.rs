//! LLM provider abstraction
//!
//! Provides a common interface for interacting with various LLM providers.

mod anthropic;
pub(crate) mod echo;
mod error;
mod gemini;
mod logging;
mod models;
mod registry;
mod types;

pub use anthropic::AnthropicService;
pub use error::LlmError;
pub use gemini::GeminiService;
pub use logging::LoggingService;
pub use models::{all_models, ModelDef, Provider};
pub use registry::{LlmConfig, ModelRegistry};
pub use types::*;

use async_trait::async_trait;

/// Common interface for LLM providers
#[async_trait]
pub trait LlmService: Send + Sync {
    /// Make a completion request
    async fn complete(&self, request: &LlmRequest) -> Result<LlmResponse, LlmError>;

    /// Get the model ID
    fn model_id(&self) -> &str;
}
