//! # mascot-chat — Chat Integration for the Mascot
//!
//! This crate connects the host-agnostic `mascot-core` controller to a
//! running chat: it drives the controller on tokio timers, runs the chat
//! reply pipeline, and maps host input to activity signals.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │                  Host UI                     │
//! │   input events          animation surface    │
//! │        │                       ▲             │
//! │        ▼                       │             │
//! │  ┌──────────┐  ┌─────────┐  ┌───────┐        │
//! │  │  events  │  │ session │  │ stage │        │
//! │  └────┬─────┘  └────┬────┘  └───┬───┘        │
//! │       └─────────────┼───────────┘            │
//! │                     ▼                        │
//! │           ┌───────────────────┐              │
//! │           │  runtime (tokio)  │──► watch     │
//! │           └─────────┬─────────┘              │
//! │                     ▼                        │
//! │           ┌───────────────────┐              │
//! │           │    mascot-core    │              │
//! │           └───────────────────┘              │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - `runtime` — task owning the controller; [`MascotHandle`] to talk to it
//! - `driver` — the [`ConversationDriver`] seam and its LLM-backed implementation
//! - `session` — chat history and the send pipeline
//! - `stage` — emotion to asset resolution and asset-failure reporting
//! - `events` — host input events mapped to activity

pub mod driver;
pub mod error;
pub mod events;
pub mod runtime;
pub mod session;
pub mod stage;

pub use driver::{ConversationDriver, LlmDriver};
pub use error::ChatError;
pub use events::HostEvent;
pub use runtime::MascotHandle;
pub use session::{ChatSession, Message};
pub use stage::Stage;
