//! Chat session: message history and the send pipeline.
//!
//! Sending a message drives the mascot through a fixed sequence:
//!
//! 1. `brainstorm` while the reply is being produced
//! 2. the reply's `[ANIMATION: ...]` tag once it arrives (default `hellow`)
//! 3. `cry` for a few seconds if the driver fails, then back to `idle`
//!
//! A reply is never shown sooner than the configured minimum delay after
//! sending, so fast backends still read as "thinking".

use std::time::Duration;

use chrono::{DateTime, Utc};
use mascot_core::config::ChatConfig;
use mascot_core::directive;
use mascot_core::emotion::Emotion;
use mascot_llm::{ChatMessage, Role};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{info, warn};
use uuid::Uuid;

use crate::driver::ConversationDriver;
use crate::runtime::MascotHandle;

/// Shown when the backend answers with nothing.
pub const EMPTY_REPLY_FALLBACK: &str = "Oops, empty response from AI. 😅";

/// One message in the visible transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Unique message ID.
    pub id: Uuid,
    /// Author.
    pub role: Role,
    /// Visible text (animation tags already removed).
    pub content: String,
    /// When the message was added.
    pub sent_at: DateTime<Utc>,
}

impl Message {
    /// A new message stamped now.
    #[must_use]
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
            content: content.into(),
            sent_at: Utc::now(),
        }
    }

    fn to_wire(&self) -> ChatMessage {
        ChatMessage {
            role: self.role,
            content: self.content.clone(),
        }
    }
}

/// A conversation with the mascot's persona.
pub struct ChatSession<D> {
    driver: D,
    mascot: MascotHandle,
    history: Vec<Message>,
    starter_prompts: Vec<String>,
    min_reply_delay: Duration,
    error_hold: Duration,
    default_emotion: Emotion,
    typing: watch::Sender<bool>,
}

impl<D: ConversationDriver> ChatSession<D> {
    /// Start a session whose transcript opens with the configured greeting.
    #[must_use]
    pub fn new(driver: D, mascot: MascotHandle, config: &ChatConfig) -> Self {
        let (typing, _) = watch::channel(false);
        Self {
            driver,
            mascot,
            history: vec![Message::new(Role::Assistant, config.greeting_message.clone())],
            starter_prompts: config.starter_prompts.clone(),
            min_reply_delay: config.min_reply_delay(),
            error_hold: config.error_hold(),
            default_emotion: config.default_reply_emotion,
            typing,
        }
    }

    /// The transcript so far, oldest first.
    #[must_use]
    pub fn history(&self) -> &[Message] {
        &self.history
    }

    /// Suggested first questions.
    #[must_use]
    pub fn starter_prompts(&self) -> &[String] {
        &self.starter_prompts
    }

    /// The mascot this session animates.
    #[must_use]
    pub fn mascot(&self) -> &MascotHandle {
        &self.mascot
    }

    /// Observe whether a reply is being produced.
    #[must_use]
    pub fn typing(&self) -> watch::Receiver<bool> {
        self.typing.subscribe()
    }

    /// Whether a reply is being produced right now.
    #[must_use]
    pub fn is_typing(&self) -> bool {
        *self.typing.borrow()
    }

    /// Send `input` and wait for the assistant's reply.
    ///
    /// Blank input is ignored and returns `None`. Driver failures do not
    /// surface as errors: they become an error message in the transcript
    /// and a crying mascot.
    pub async fn send(&mut self, input: &str) -> Option<&Message> {
        let input = input.trim();
        if input.is_empty() {
            return None;
        }

        self.history.push(Message::new(Role::User, input));
        self.mascot.request_emotion(Emotion::Brainstorm, None);
        self.typing.send_replace(true);

        let wire: Vec<ChatMessage> = self.history.iter().map(Message::to_wire).collect();
        let (result, ()) = tokio::join!(
            self.driver.complete(&wire),
            tokio::time::sleep(self.min_reply_delay),
        );

        let reply = match result {
            Ok(text) => {
                let text = if text.trim().is_empty() {
                    EMPTY_REPLY_FALLBACK.to_string()
                } else {
                    text
                };
                let directive = directive::extract(&text, self.default_emotion);
                info!(emotion = %directive.emotion_id, tagged = directive.tagged, "Chat reply");
                self.mascot.request_emotion(directive.emotion(), None);
                directive.message
            }
            Err(e) => {
                warn!(error = %e, "Chat reply failed");
                self.mascot.request_emotion(Emotion::Cry, Some(self.error_hold));
                format!("CRITICAL ERROR: {e}.")
            }
        };

        self.typing.send_replace(false);
        self.history.push(Message::new(Role::Assistant, reply));
        self.history.last()
    }
}
