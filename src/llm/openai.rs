use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;

use super::{LlmClient, StructuredRequest};
use crate::config::LlmSettings;

const TOOL_NAME: &str = "generate_structured_output";
const MIN_BACKOFF_SECS: u64 = 2;
const MAX_BACKOFF_SECS: u64 = 10;

/// Chat-completions client that forces a single function call so the
/// answer arrives as schema-shaped JSON
pub struct OpenAiClient {
    http_client: reqwest::Client,
    api_key: String,
    model: String,
    temperature: f32,
    base_url: String,
    max_attempts: u32,
}

impl OpenAiClient {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Result<Self> {
        Self::with_settings(
            api_key,
            &LlmSettings {
                model: model.into(),
                ..LlmSettings::default()
            },
        )
    }

    pub fn with_settings(api_key: impl Into<String>, settings: &LlmSettings) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http_client,
            api_key: api_key.into(),
            model: settings.model.clone(),
            temperature: settings.temperature,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            max_attempts: settings.max_attempts.max(1),
        })
    }

    /// Build a client from settings, or `None` when no API key is configured
    pub fn from_settings(settings: &LlmSettings) -> Result<Option<Self>> {
        match settings.api_key.as_deref() {
            Some(key) if !key.trim().is_empty() => {
                let client = Self::with_settings(key, settings)?;
                log::info!("LLM client initialized with model: {}", settings.model);
                Ok(Some(client))
            }
            _ => {
                log::warn!("OPENAI_API_KEY is not set, events are disabled");
                Ok(None)
            }
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn request_body(&self, request: &StructuredRequest) -> Value {
        json!({
            "model": self.model,
            "response_format": { "type": "json_object" },
            "messages": [
                { "role": "system", "content": request.system_prompt },
                { "role": "user", "content": request.user_prompt },
            ],
            "temperature": request.temperature.unwrap_or(self.temperature),
            "tools": [{
                "type": "function",
                "function": {
                    "name": TOOL_NAME,
                    "description": "Generate a structured output based on the schema",
                    "parameters": request.schema,
                }
            }],
            "tool_choice": { "type": "function", "function": { "name": TOOL_NAME } },
        })
    }

    async fn send_once(&self, body: &Value) -> std::result::Result<ChatResponse, SendError> {
        let response = self
            .http_client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await
            .map_err(SendError::from_reqwest)?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(SendError::Fatal(anyhow!("OpenAI API returned {}: {}", status, text)));
        }

        response
            .json::<ChatResponse>()
            .await
            .map_err(|e| SendError::Fatal(anyhow!("Failed to decode OpenAI response: {}", e)))
    }
}

#[async_trait]
impl LlmClient for OpenAiClient {
    async fn query(&self, request: &StructuredRequest) -> Result<String> {
        let body = self.request_body(request);
        log::debug!("Sending structured request to {}", self.model);

        let mut attempt = 1;
        let response = loop {
            match self.send_once(&body).await {
                Ok(response) => break response,
                Err(SendError::Retryable(e)) if attempt < self.max_attempts => {
                    let delay = backoff_delay(attempt);
                    log::warn!(
                        "LLM request failed (attempt {}/{}): {}. Retrying in {:?}",
                        attempt,
                        self.max_attempts,
                        e,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(SendError::Retryable(e)) | Err(SendError::Fatal(e)) => {
                    log::error!("Error generating structured output: {}", e);
                    return Err(e);
                }
            }
        };

        structured_output(response)
    }
}

/// Wait after failed attempt `attempt` (1-based): 2^(attempt-1) seconds
/// clamped to 2..=10, so 2, 2, 4, 8, 10
fn backoff_delay(attempt: u32) -> Duration {
    let secs = 1u64
        .checked_shl(attempt.saturating_sub(1))
        .unwrap_or(MAX_BACKOFF_SECS);
    Duration::from_secs(secs.clamp(MIN_BACKOFF_SECS, MAX_BACKOFF_SECS))
}

/// Prefer the forced tool call's arguments, fall back to message content
fn structured_output(response: ChatResponse) -> Result<String> {
    let message = response
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.message)
        .context("OpenAI response contained no choices")?;

    if let Some(call) = message.tool_calls.and_then(|calls| calls.into_iter().next()) {
        return Ok(call.function.arguments);
    }

    match message.content {
        Some(content) if !content.trim().is_empty() => Ok(content),
        _ => bail!("No structured output found in response"),
    }
}

enum SendError {
    /// Timeouts and connection failures
    Retryable(anyhow::Error),
    Fatal(anyhow::Error),
}

impl SendError {
    fn from_reqwest(e: reqwest::Error) -> Self {
        if e.is_timeout() || e.is_connect() {
            SendError::Retryable(e.into())
        } else {
            SendError::Fatal(e.into())
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
    tool_calls: Option<Vec<ToolCall>>,
}

#[derive(Debug, Deserialize)]
struct ToolCall {
    function: FunctionCall,
}

#[derive(Debug, Deserialize)]
struct FunctionCall {
    arguments: String,
}
