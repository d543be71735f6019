//! Centralized model definitions for all LLM providers

use super::anthropic::AnthropicModel;
use super::gemini::GeminiModel;
use super::{AnthropicService, GeminiService, LlmService};
use std::sync::Arc;

/// LLM provider enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provider {
    Gemini,
    Anthropic,
}

impl Provider {
    pub fn display_name(self) -> &'static str {
        match self {
            Provider::Gemini => "Google Gemini",
            Provider::Anthropic => "Anthropic",
        }
    }

    /// Environment variable holding this provider's API key
    pub fn api_key_env_var(self) -> &'static str {
        match self {
            Provider::Gemini => "GEMINI_API_KEY",
            Provider::Anthropic => "ANTHROPIC_API_KEY",
        }
    }
}

/// Model definition with metadata
#[derive(Debug, Clone)]
pub struct ModelDef {
    /// User-facing model ID
    pub id: &'static str,
    pub provider: Provider,
    pub description: &'static str,
    /// Factory function to create the service
    pub factory: fn(&str, Option<&str>) -> Result<Arc<dyn LlmService>, String>,
}

/// Get all available model definitions, preferred default first
pub fn all_models() -> &'static [ModelDef] {
    &[
        ModelDef {
            id: "gemini-1.5-flash",
            provider: Provider::Gemini,
            description: "Gemini 1.5 Flash (fast, default)",
            factory: |api_key, gateway| {
                let service =
                    GeminiService::new(api_key.to_string(), GeminiModel::Gemini15Flash, gateway)?;
                Ok(Arc::new(service))
            },
        },
        ModelDef {
            id: "gemini-1.5-pro",
            provider: Provider::Gemini,
            description: "Gemini 1.5 Pro (more capable)",
            factory: |api_key, gateway| {
                let service =
                    GeminiService::new(api_key.to_string(), GeminiModel::Gemini15Pro, gateway)?;
                Ok(Arc::new(service))
            },
        },
        ModelDef {
            id: "claude-4.5-sonnet",
            provider: Provider::Anthropic,
            description: "Claude Sonnet 4.5 (balanced performance)",
            factory: |api_key, gateway| {
                let service = AnthropicService::new(
                    api_key.to_string(),
                    AnthropicModel::Claude45Sonnet,
                    gateway,
                )?;
                Ok(Arc::new(service))
            },
        },
        ModelDef {
            id: "claude-4.5-haiku",
            provider: Provider::Anthropic,
            description: "Claude Haiku 4.5 (fast, efficient)",
            factory: |api_key, gateway| {
                let service = AnthropicService::new(
                    api_key.to_string(),
                    AnthropicModel::Claude45Haiku,
                    gateway,
                )?;
                Ok(Arc::new(service))
            },
        },
    ]
}
