//! Model registry for managing available LLM providers

use super::echo::{EchoService, ECHO_MODEL_ID};
use super::{all_models, LlmService, LoggingService, ModelDef, Provider};
use std::collections::HashMap;
use std::sync::Arc;

/// Configuration for LLM providers
#[derive(Debug, Clone, Default)]
pub struct LlmConfig {
    pub gemini_api_key: Option<String>,
    pub anthropic_api_key: Option<String>,
    /// Proxy that injects credentials itself
    pub gateway: Option<String>,
    /// Default model ID
    pub default_model: Option<String>,
}

/// Registry of available LLM models
pub struct ModelRegistry {
    services: HashMap<String, Arc<dyn LlmService>>,
    default_model: String,
}

impl ModelRegistry {
    pub fn new(config: &LlmConfig) -> Self {
        let mut services: HashMap<String, Arc<dyn LlmService>> = HashMap::new();

        for model_def in all_models() {
            if let Some(service) = Self::try_create_model(model_def, config) {
                services.insert(model_def.id.to_string(), service);
            }
        }

        // Preference follows definition order
        let default_model = config
            .default_model
            .clone()
            .filter(|id| services.contains_key(id))
            .or_else(|| {
                all_models()
                    .iter()
                    .find(|m| services.contains_key(m.id))
                    .map(|m| m.id.to_string())
            })
            .unwrap_or_else(|| ECHO_MODEL_ID.to_string());

        if !services.contains_key(&default_model) {
            services.insert(
                ECHO_MODEL_ID.to_string(),
                LoggingService::wrap(Arc::new(EchoService)),
            );
        }

        Self {
            services,
            default_model,
        }
    }

    /// Try to create a model service, validating prerequisites
    fn try_create_model(model_def: &ModelDef, config: &LlmConfig) -> Option<Arc<dyn LlmService>> {
        let api_key = if config.gateway.is_some() {
            "implicit".to_string()
        } else {
            match model_def.provider {
                Provider::Gemini => config.gemini_api_key.as_ref()?,
                Provider::Anthropic => config.anthropic_api_key.as_ref()?,
            }
            .clone()
        };

        if config.gateway.is_none() && api_key.trim().is_empty() {
            return None;
        }

        match (model_def.factory)(&api_key, config.gateway.as_deref()) {
            Ok(service) => Some(LoggingService::wrap(service)),
            Err(e) => {
                tracing::warn!(model = %model_def.id, error = %e, "Failed to create model");
                None
            }
        }
    }

    /// Get a model by ID
    pub fn get(&self, model_id: &str) -> Option<Arc<dyn LlmService>> {
        self.services.get(model_id).cloned()
    }

    /// Get the default model; always present
    pub fn default_service(&self) -> Arc<dyn LlmService> {
        self.get(&self.default_model)
            .unwrap_or_else(|| LoggingService::wrap(Arc::new(EchoService)))
    }

    pub fn default_model_id(&self) -> &str {
        &self.default_model
    }

    /// List all available model IDs
    pub fn available_models(&self) -> Vec<String> {
        let mut models: Vec<_> = self.services.keys().cloned().collect();
        models.sort();
        models
    }

    /// Whether a real provider is configured (not just the echo stand-in)
    pub fn has_provider(&self) -> bool {
        self.default_model != ECHO_MODEL_ID
    }
}
