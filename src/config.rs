//! Process configuration from environment variables

use crate::llm::{LlmConfig, Provider};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_OUTPUT_PATH: &str = "outputs/presentation.pptx";
pub const DEFAULT_SEARCH_MAX_RESULTS: usize = 5;
pub const DEFAULT_SEARCH_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    /// Single artifact path shared by every session
    pub deck_output_path: PathBuf,
    pub search_max_results: usize,
    pub search_timeout: Duration,
    pub llm: LlmConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            deck_output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            search_max_results: DEFAULT_SEARCH_MAX_RESULTS,
            search_timeout: Duration::from_secs(DEFAULT_SEARCH_TIMEOUT_SECS),
            llm: LlmConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load through an arbitrary variable lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        Self {
            port: parse_or(&var, "DECKBOT_PORT", DEFAULT_PORT),
            deck_output_path: var("DECK_OUTPUT_PATH")
                .map_or_else(|| PathBuf::from(DEFAULT_OUTPUT_PATH), PathBuf::from),
            search_max_results: parse_or(&var, "SEARCH_MAX_RESULTS", DEFAULT_SEARCH_MAX_RESULTS)
                .max(1),
            search_timeout: Duration::from_secs(
                parse_or(&var, "SEARCH_TIMEOUT_SEC", DEFAULT_SEARCH_TIMEOUT_SECS).max(1),
            ),
            llm: LlmConfig {
                gemini_api_key: var(Provider::Gemini.api_key_env_var()),
                anthropic_api_key: var(Provider::Anthropic.api_key_env_var()),
                gateway: var("LLM_GATEWAY"),
                default_model: var("DEFAULT_MODEL"),
            },
        }
    }
}

fn parse_or<T>(var: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T
where
    T: FromStr + Copy + std::fmt::Display,
{
    match var(key) {
        None => default,
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %raw, default = %default, "Ignoring unparseable setting");
            default
        }),
    }
}
