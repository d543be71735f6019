//! Offline stand-in used when no provider key is configured

use super::types::{LlmRequest, LlmResponse};
use super::{LlmError, LlmService};
use async_trait::async_trait;

pub const ECHO_MODEL_ID: &str = "echo";

/// Answers every request by echoing the prompt back
#[derive(Debug, Default)]
pub struct EchoService;

#[async_trait]
impl LlmService for EchoService {
    async fn complete(&self, request: &LlmRequest) -> Result<LlmResponse, LlmError> {
        Ok(LlmResponse::text(format!("[Dummy LLM] {}", request.prompt)))
    }

    fn model_id(&self) -> &str {
        ECHO_MODEL_ID
    }
}
