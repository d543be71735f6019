//! Common types for LLM interactions

/// LLM request
#[derive(Debug, Clone)]
pub struct LlmRequest {
    pub system: Option<String>,
    pub prompt: String,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
    pub purpose: RequestPurpose,
}

/// What a completion is for; shows up in request logs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RequestPurpose {
    #[default]
    Chat,
    Summary,
}

impl RequestPurpose {
    pub fn label(self) -> &'static str {
        match self {
            RequestPurpose::Chat => "chat",
            RequestPurpose::Summary => "summary",
        }
    }
}

impl LlmRequest {
    /// Single-turn request with an optional system prompt
    pub fn single_turn(system: Option<&str>, prompt: impl Into<String>) -> Self {
        Self {
            system: system.map(ToString::to_string),
            prompt: prompt.into(),
            max_tokens: None,
            temperature: None,
            purpose: RequestPurpose::Chat,
        }
    }

    pub fn with_purpose(mut self, purpose: RequestPurpose) -> Self {
        self.purpose = purpose;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

/// LLM response
#[derive(Debug, Clone)]
pub struct LlmResponse {
    pub text: String,
    pub usage: Usage,
}

impl LlmResponse {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            usage: Usage::default(),
        }
    }
}

/// Usage statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Usage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}
