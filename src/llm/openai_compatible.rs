//! OpenAI-compatible chat completion client (`/v1/chat/completions`).
//!
//! All wire types are private to this module. Covers OpenAI itself and
//! compatible servers (Ollama, LM Studio, hosted gateways).

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, error, instrument};

use super::LlmClient;
use crate::config::LlmConfig;
use crate::{AgentError, Result};

#[derive(Debug, Clone)]
pub struct OpenAiCompatibleClient {
    client: Client,
    api_url: String,
    model: String,
    temperature: f32,
    api_key: Option<String>,
}

impl OpenAiCompatibleClient {
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds.into()))
            .build()
            .map_err(|e| AgentError::llm(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_url: config.api_url.clone(),
            model: config.model.clone(),
            temperature: config.temperature,
            api_key: config.api_key.clone(),
        })
    }

    fn payload(&self, system: Option<&str>, user: &str) -> ChatCompletionRequest {
        // gpt-5 family models reject an explicit temperature
        let temperature = if self.model.starts_with("gpt-5") {
            None
        } else {
            Some(self.temperature)
        };

        let mut messages = Vec::with_capacity(2);
        if let Some(system) = system {
            messages.push(Message {
                role: "system".to_string(),
                content: system.to_string(),
            });
        }
        messages.push(Message {
            role: "user".to_string(),
            content: user.to_string(),
        });

        ChatCompletionRequest {
            model: self.model.clone(),
            messages,
            temperature,
        }
    }
}

#[async_trait]
impl LlmClient for OpenAiCompatibleClient {
    #[instrument(skip_all, fields(model = %self.model))]
    async fn complete(&self, system: Option<&str>, user: &str) -> Result<String> {
        let payload = self.payload(system, user);
        debug!(content_len = user.len(), "sending LLM request");
        let start_time = Instant::now();

        let mut request = self.client.post(&self.api_url).json(&payload);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await.map_err(|e| {
            let e = e.without_url();
            error!(url = %self.api_url, error = %e, "LLM HTTP request failed (transport)");
            AgentError::llm(e.to_string())
        })?;

        let response = check_status(response).await?;

        let parsed = response
            .json::<ChatCompletionResponse>()
            .await
            .map_err(|e| {
                let e = e.without_url();
                error!(error = %e, "failed to deserialize LLM response");
                AgentError::llm(format!("failed to parse response body: {e}"))
            })?;

        debug!(
            choices = parsed.choices.len(),
            "received LLM response in {:.3}s",
            start_time.elapsed().as_secs_f64()
        );

        extract_text(parsed)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

fn extract_text(parsed: ChatCompletionResponse) -> Result<String> {
    parsed
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
        .ok_or_else(|| AgentError::llm("empty or missing content in response"))
}

// ── Private wire types ────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

// Error envelope used by OpenAI and compatible APIs.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Consume the response and return it if successful, or a structured error.
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "<failed to read error body>".to_string());

    let message = match serde_json::from_str::<ErrorEnvelope>(&body) {
        Ok(envelope) => format!("HTTP {status}: {}", envelope.error.message),
        Err(_) => format!("HTTP {status}: {body}"),
    };

    error!(%status, %message, "LLM request returned HTTP error");
    Err(AgentError::llm(message))
}
