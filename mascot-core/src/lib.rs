//! # Mascot Core Library
//!
//! Host-agnostic emotion controller for an animated chat mascot.
//!
//! The controller owns exactly one piece of visible state, the displayed
//! [`Emotion`], and two policies that mutate it:
//!
//! - **Priority-debounced transitions** — a requested emotion preempts the
//!   current one when its priority tier is strictly higher; otherwise it waits
//!   until the current emotion has been on screen for the minimum display
//!   time. Rapid deferred requests coalesce to the most recent one.
//! - **Idle decay** — after a period without activity the mascot picks a
//!   random ambient emotion from a curated idle set.
//!
//! Everything here is synchronous and deterministic: the current time is
//! passed into every operation as a [`Timestamp`], and timers are deadlines in
//! named slots that the host drives through [`MascotController::tick`].
//!
//! ## Modules
//!
//! - `emotion` — the closed emotion identifier set
//! - `catalog` — priority tiers and animation assets per emotion
//! - `controller` — the state machine
//! - `timer` — single-occupancy timer slots
//! - `directive` — `[ANIMATION: <id>]` tag extraction from reply text
//! - `config` — TOML configuration

#![deny(clippy::unwrap_used)]
#![deny(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod catalog;
pub mod config;
pub mod controller;
pub mod directive;
pub mod emotion;
pub mod error;
pub mod timer;
pub mod types;

pub use catalog::{AssetRef, EmotionCatalog, Priority};
pub use config::MascotConfig;
pub use controller::{
    ActivityOutcome, MascotController, RequestOutcome, Snapshot, Transition, TransitionCause,
};
pub use emotion::Emotion;
pub use error::MascotError;
pub use types::Timestamp;
