//! # mascot-llm — Chat Completion Layer for the Mascot
//!
//! Provides the Conversation Driver backend: given the chat history, produce
//! reply text that may start with an `[ANIMATION: <id>]` directive.
//!
//! Supported backends:
//!   - **OpenAI-compatible API** (Groq, OpenAI, Together, ...)
//!   - **Ollama** (local)
//!   - **None** (offline; every call fails and the chat shows its error reaction)
//!
//! All calls go through [`LlmClient`], which handles:
//!   - Timeout management
//!   - Retry with bounded attempts
//!   - Provider error bodies surfaced as readable messages

pub mod client;
pub mod error;
pub mod prompt;
pub mod types;

pub use client::{LlmClient, LlmProvider};
pub use error::LlmError;
pub use types::{ChatMessage, LlmRequest, LlmResponse, Role};
