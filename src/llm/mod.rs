pub mod openai;

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;

/// A prompt pair plus the JSON schema the answer must follow
#[derive(Debug, Clone)]
pub struct StructuredRequest {
    pub system_prompt: String,
    pub user_prompt: String,
    pub schema: Value,
    /// Overrides the client's default temperature
    pub temperature: Option<f32>,
}

impl StructuredRequest {
    pub fn new(system_prompt: impl Into<String>, user_prompt: impl Into<String>, schema: Value) -> Self {
        Self {
            system_prompt: system_prompt.into(),
            user_prompt: user_prompt.into(),
            schema,
            temperature: None,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Returns the raw JSON text produced for the request
    async fn query(&self, request: &StructuredRequest) -> Result<String>;
}

pub use openai::OpenAiClient;
