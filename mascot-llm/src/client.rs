//! LLM Client — unified interface for OpenAI-compatible and Ollama chat backends.

use std::time::{Duration, Instant};

use mascot_core::config::LlmConfig;
use reqwest::{Client, StatusCode};
use serde_json::{Value, json};
use tracing::{debug, warn};

use crate::error::LlmError;
use crate::types::{LlmRequest, LlmResponse};

/// Provider backend for chat completions.
#[derive(Debug, Clone)]
pub enum LlmProvider {
    /// OpenAI-compatible API (Groq, OpenAI, Together, ...).
    OpenAiCompatible { base_url: String, api_key: String },
    /// Ollama running locally.
    Ollama { base_url: String },
    /// No LLM available — every call fails.
    None,
}

/// The chat client that routes requests to the configured backend.
pub struct LlmClient {
    provider: LlmProvider,
    http: Client,
    model: String,
    max_retries: u32,
}

impl LlmClient {
    /// Create a new LLM client.
    #[must_use]
    pub fn new(provider: LlmProvider, model: impl Into<String>, max_retries: u32) -> Self {
        Self {
            provider,
            http: Client::new(),
            model: model.into(),
            max_retries,
        }
    }

    /// Create a client with no LLM backend.
    #[must_use]
    pub fn none() -> Self {
        Self::new(LlmProvider::None, String::new(), 0)
    }

    /// Build a client from configuration, reading the API key from the environment.
    ///
    /// # Errors
    /// Returns `LlmError::ConfigError` for an unknown provider or a missing API key.
    pub fn from_config(config: &LlmConfig) -> Result<Self, LlmError> {
        let base_url = config.base_url.trim_end_matches('/').to_string();
        let provider = match config.provider.as_str() {
            "openai" => {
                let api_key = std::env::var(&config.api_key_env).map_err(|_| {
                    LlmError::ConfigError(format!(
                        "environment variable {} is not set",
                        config.api_key_env
                    ))
                })?;
                LlmProvider::OpenAiCompatible { base_url, api_key }
            }
            "ollama" => LlmProvider::Ollama { base_url },
            "none" => LlmProvider::None,
            other => {
                return Err(LlmError::ConfigError(format!("unknown provider {other:?}")));
            }
        };
        Ok(Self::new(provider, config.model.clone(), config.max_retries))
    }

    /// Model name sent with each request.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Check if the client has a backend configured.
    #[must_use]
    pub fn is_available(&self) -> bool {
        !matches!(self.provider, LlmProvider::None)
    }

    /// Generate a reply for the conversation in `request`.
    ///
    /// Server errors and transport failures are retried up to `max_retries`
    /// times; client errors (bad key, bad request) are returned at once.
    pub async fn generate(&self, request: &LlmRequest) -> Result<LlmResponse, LlmError> {
        let (url, body, api_key) = match &self.provider {
            LlmProvider::None => {
                return Err(LlmError::Unavailable("No LLM provider configured".into()));
            }
            LlmProvider::OpenAiCompatible { base_url, api_key } => (
                format!("{base_url}/v1/chat/completions"),
                json!({
                    "model": self.model,
                    "messages": request.messages,
                    "temperature": request.temperature,
                    "max_tokens": request.max_tokens,
                }),
                Some(api_key.as_str()),
            ),
            LlmProvider::Ollama { base_url } => (
                format!("{base_url}/api/chat"),
                json!({
                    "model": self.model,
                    "messages": request.messages,
                    "stream": false,
                    "options": {
                        "temperature": request.temperature,
                        "num_predict": request.max_tokens,
                    }
                }),
                None,
            ),
        };

        let mut last_error = String::new();
        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                debug!("Retrying LLM call (attempt {}/{})", attempt + 1, self.max_retries + 1);
            }

            let start = Instant::now();
            let mut builder = self
                .http
                .post(&url)
                .json(&body)
                .timeout(Duration::from_millis(request.timeout_ms));
            if let Some(key) = api_key {
                builder = builder.bearer_auth(key);
            }
            let result = builder.send().await;
            let latency_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

            match result {
                Ok(resp) => {
                    let status = resp.status();
                    let raw = resp.text().await?;

                    if status.is_success() {
                        let json: Value = serde_json::from_str(&raw)
                            .map_err(|e| LlmError::ParseError(e.to_string()))?;
                        return self.parse_reply(&json, latency_ms);
                    }

                    let json: Value = serde_json::from_str(&raw).unwrap_or(Value::Null);

                    let message = api_error_message(&json)
                        .unwrap_or_else(|| format!("API Error: {}", status.as_u16()));
                    warn!(status = status.as_u16(), %message, "Chat API returned error");
                    if !is_retryable(status) {
                        return Err(LlmError::Api { status: status.as_u16(), message });
                    }
                    last_error = message;
                }
                Err(e) => {
                    last_error = e.to_string();
                    if e.is_timeout() {
                        warn!("Chat request timed out after {}ms", request.timeout_ms);
                    } else {
                        warn!("Chat request failed: {}", last_error);
                    }
                }
            }
        }

        Err(LlmError::RetriesExhausted {
            attempts: self.max_retries + 1,
            last_error,
        })
    }

    fn parse_reply(&self, json: &Value, latency_ms: u64) -> Result<LlmResponse, LlmError> {
        let (text, tokens) = match self.provider {
            LlmProvider::Ollama { .. } => (
                json["message"]["content"].as_str(),
                json["eval_count"].as_u64(),
            ),
            _ => (
                json["choices"][0]["message"]["content"].as_str(),
                json["usage"]["completion_tokens"].as_u64(),
            ),
        };
        let text = text
            .ok_or_else(|| LlmError::ParseError(format!("no reply text in response: {json}")))?;

        Ok(LlmResponse {
            text: text.to_string(),
            tokens_generated: tokens.and_then(|t| u32::try_from(t).ok()).unwrap_or(0),
            latency_ms,
            model: json["model"].as_str().unwrap_or(&self.model).to_string(),
        })
    }
}

/// Extract the provider's error message from an error body, if present.
#[must_use]
pub fn api_error_message(json: &Value) -> Option<String> {
    json["error"]["message"]
        .as_str()
        .or_else(|| json["error"].as_str())
        .map(str::to_string)
}

fn is_retryable(status: StatusCode) -> bool {
    status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ChatMessage;

    #[test]
    fn openai_reply_is_parsed() {
        let client = LlmClient::new(
            LlmProvider::OpenAiCompatible { base_url: "http://x".into(), api_key: "k".into() },
            "m",
            0,
        );
        let body = json!({
            "model": "llama-3.3-70b-versatile",
            "choices": [{ "message": { "role": "assistant", "content": "[ANIMATION: love] hi" } }],
            "usage": { "completion_tokens": 7 }
        });
        let reply = client.parse_reply(&body, 12).expect("parse");
        assert_eq!(reply.text, "[ANIMATION: love] hi");
        assert_eq!(reply.tokens_generated, 7);
        assert_eq!(reply.model, "llama-3.3-70b-versatile");
    }

    #[test]
    fn ollama_reply_is_parsed() {
        let client = LlmClient::new(LlmProvider::Ollama { base_url: "http://x".into() }, "qwen", 0);
        let body = json!({ "message": { "content": "hello" }, "eval_count": 3 });
        let reply = client.parse_reply(&body, 1).expect("parse");
        assert_eq!(reply.text, "hello");
        assert_eq!(reply.model, "qwen");
    }

    #[test]
    fn missing_text_is_a_parse_error() {
        let client = LlmClient::new(LlmProvider::Ollama { base_url: "http://x".into() }, "qwen", 0);
        let err = client.parse_reply(&json!({}), 1).expect_err("no text");
        assert!(matches!(err, LlmError::ParseError(_)));
    }

    #[test]
    fn error_message_is_extracted() {
        let body = json!({ "error": { "message": "Invalid API Key" } });
        assert_eq!(api_error_message(&body).as_deref(), Some("Invalid API Key"));
        assert_eq!(api_error_message(&json!({ "error": "model not found" })).as_deref(), Some("model not found"));
        assert_eq!(api_error_message(&json!({})), None);
    }

    #[test]
    fn only_server_errors_and_rate_limits_retry() {
        assert!(is_retryable(StatusCode::BAD_GATEWAY));
        assert!(is_retryable(StatusCode::TOO_MANY_REQUESTS));
        assert!(!is_retryable(StatusCode::UNAUTHORIZED));
    }

    #[test]
    fn from_config_selects_provider() {
        let mut config = LlmConfig::default();
        config.provider = "none".into();
        assert!(!LlmClient::from_config(&config).expect("none").is_available());

        config.provider = "ollama".into();
        config.base_url = "http://localhost:11434/".into();
        let client = LlmClient::from_config(&config).expect("ollama");
        assert!(client.is_available());

        config.provider = "carrier-pigeon".into();
        assert!(LlmClient::from_config(&config).is_err());

        config.provider = "openai".into();
        config.api_key_env = "MASCOT_TEST_KEY_THAT_IS_NEVER_SET".into();
        assert!(matches!(LlmClient::from_config(&config), Err(LlmError::ConfigError(_))));
    }

    #[tokio::test]
    async fn none_provider_is_unavailable() {
        let client = LlmClient::none();
        let err = client
            .generate(&LlmRequest::new(vec![ChatMessage::user("hi")]))
            .await
            .expect_err("offline");
        assert!(matches!(err, LlmError::Unavailable(_)));
    }
}
