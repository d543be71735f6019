//! Structured request logging around any [`LlmService`]

use super::{LlmError, LlmRequest, LlmResponse, LlmService};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Instant;

/// Emits one event per completion: purpose, latency, sizes and token usage
pub struct LoggingService {
    inner: Arc<dyn LlmService>,
    model_id: String,
}

impl LoggingService {
    pub fn wrap(inner: Arc<dyn LlmService>) -> Arc<dyn LlmService> {
        let model_id = inner.model_id().to_string();
        Arc::new(Self { inner, model_id })
    }
}

#[async_trait]
impl LlmService for LoggingService {
    async fn complete(&self, request: &LlmRequest) -> Result<LlmResponse, LlmError> {
        let start = Instant::now();
        let result = self.inner.complete(request).await;
        let elapsed_ms = start.elapsed().as_millis();
        let purpose = request.purpose.label();

        match &result {
            Ok(response) if response.text.trim().is_empty() => {
                tracing::warn!(
                    model = %self.model_id,
                    purpose,
                    elapsed_ms = %elapsed_ms,
                    output_tokens = response.usage.output_tokens,
                    "LLM returned no text"
                );
            }
            Ok(response) => {
                tracing::info!(
                    model = %self.model_id,
                    purpose,
                    elapsed_ms = %elapsed_ms,
                    prompt_chars = request.prompt.chars().count(),
                    reply_chars = response.text.chars().count(),
                    input_tokens = response.usage.input_tokens,
                    output_tokens = response.usage.output_tokens,
                    "LLM request completed"
                );
            }
            Err(e) if e.kind.is_retryable() => {
                tracing::warn!(
                    model = %self.model_id,
                    purpose,
                    elapsed_ms = %elapsed_ms,
                    kind = e.kind.label(),
                    error = %e.message,
                    "LLM request failed, provider may recover"
                );
            }
            Err(e) => {
                tracing::error!(
                    model = %self.model_id,
                    purpose,
                    elapsed_ms = %elapsed_ms,
                    kind = e.kind.label(),
                    error = %e.message,
                    "LLM request failed"
                );
            }
        }

        result
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::echo::EchoService;
    use crate::llm::RequestPurpose;

    struct Overloaded;

    #[async_trait]
    impl LlmService for Overloaded {
        async fn complete(&self, _request: &LlmRequest) -> Result<LlmResponse, LlmError> {
            Err(LlmError::server_error("overloaded"))
        }

        fn model_id(&self) -> &str {
            "overloaded-model"
        }
    }

    #[tokio::test]
    async fn test_passes_response_through() {
        let service = LoggingService::wrap(Arc::new(EchoService));
        let request =
            LlmRequest::single_turn(None, "deck").with_purpose(RequestPurpose::Summary);

        let response = service.complete(&request).await.unwrap();

        assert_eq!(response.text, "[Dummy LLM] deck");
        assert_eq!(service.model_id(), "echo");
    }

    #[tokio::test]
    async fn test_passes_error_through() {
        let service = LoggingService::wrap(Arc::new(Overloaded));

        let err = service
            .complete(&LlmRequest::single_turn(None, "hi"))
            .await
            .unwrap_err();

        assert_eq!(err.message, "overloaded");
        assert!(err.kind.is_retryable());
        assert_eq!(service.model_id(), "overloaded-model");
    }
}
