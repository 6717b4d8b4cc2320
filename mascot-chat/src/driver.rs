//! The conversation driver seam.
//!
//! A [`ConversationDriver`] turns the chat history into the next assistant
//! reply. The production driver wraps [`LlmClient`] and injects the persona
//! system prompt; tests substitute a scripted driver.

use std::future::Future;

use mascot_core::catalog::EmotionCatalog;
use mascot_core::config::MascotConfig;
use mascot_llm::prompt::persona_system_prompt;
use mascot_llm::{ChatMessage, LlmClient, LlmError, LlmRequest};
use tracing::debug;

/// Produces the next assistant reply for a conversation.
pub trait ConversationDriver: Send + Sync {
    /// Complete the conversation. `history` holds user and assistant turns
    /// in order, without a system prompt.
    fn complete(
        &self,
        history: &[ChatMessage],
    ) -> impl Future<Output = Result<String, LlmError>> + Send;
}

/// Driver backed by a chat-completion API.
pub struct LlmDriver {
    client: LlmClient,
    system_prompt: String,
    temperature: f32,
    max_tokens: u32,
    timeout_ms: u64,
}

impl LlmDriver {
    /// Build a driver from configuration.
    ///
    /// # Errors
    /// Returns `LlmError::ConfigError` if the client cannot be configured.
    pub fn from_config(config: &MascotConfig, catalog: &EmotionCatalog) -> Result<Self, LlmError> {
        let client = LlmClient::from_config(&config.llm)?;
        Ok(Self::new(client, config, catalog))
    }

    /// Wrap an existing client.
    #[must_use]
    pub fn new(client: LlmClient, config: &MascotConfig, catalog: &EmotionCatalog) -> Self {
        Self {
            client,
            system_prompt: persona_system_prompt(&config.chat, catalog),
            temperature: config.llm.temperature,
            max_tokens: config.llm.max_tokens,
            timeout_ms: config.llm.timeout_ms,
        }
    }

    /// The rendered persona prompt.
    #[must_use]
    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    fn request(&self, history: &[ChatMessage]) -> LlmRequest {
        let mut messages = Vec::with_capacity(history.len() + 1);
        messages.push(ChatMessage::system(self.system_prompt.clone()));
        messages.extend_from_slice(history);

        LlmRequest::new(messages)
            .with_temperature(self.temperature)
            .with_max_tokens(self.max_tokens)
            .with_timeout(self.timeout_ms)
    }
}

impl ConversationDriver for LlmDriver {
    async fn complete(&self, history: &[ChatMessage]) -> Result<String, LlmError> {
        let request = self.request(history);
        let response = self.client.generate(&request).await?;
        debug!(
            model = %response.model,
            tokens = response.tokens_generated,
            latency_ms = response.latency_ms,
            "Chat reply received"
        );
        Ok(response.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mascot_llm::Role;

    #[test]
    fn request_starts_with_persona_prompt() {
        let mut config = MascotConfig::default();
        config.llm.temperature = 0.3;
        config.llm.max_tokens = 256;
        let driver = LlmDriver::new(LlmClient::none(), &config, &EmotionCatalog::default());

        let request = driver.request(&[ChatMessage::user("hi")]);
        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.messages[0].role, Role::System);
        assert!(request.messages[0].content.contains("[ANIMATION: name]"));
        assert_eq!(request.messages[1], ChatMessage::user("hi"));
        assert_eq!(request.max_tokens, 256);
        assert!((request.temperature - 0.3).abs() < f32::EPSILON);
    }

    #[tokio::test]
    async fn offline_driver_fails() {
        let config = MascotConfig::default();
        let driver = LlmDriver::new(LlmClient::none(), &config, &EmotionCatalog::default());
        let err = driver.complete(&[ChatMessage::user("hi")]).await.expect_err("offline");
        assert!(matches!(err, LlmError::Unavailable(_)));
    }
}
