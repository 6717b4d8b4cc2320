//! Configuration for the mascot system.
//!
//! Maps directly to `mascot.toml`. Every field has a default, so an empty file
//! (or no file at all) yields the stock chat widget behaviour.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::emotion::Emotion;
use crate::error::{MascotError, Result};

/// Top-level mascot configuration, loadable from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MascotConfig {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,
    /// Emotion arbitration timing.
    #[serde(default)]
    pub timing: TimingConfig,
    /// Idle-decay policy.
    #[serde(default)]
    pub idle: IdleConfig,
    /// Emotion catalog asset layout.
    #[serde(default)]
    pub catalog: CatalogConfig,
    /// Chat completion backend.
    #[serde(default)]
    pub llm: LlmConfig,
    /// Chat session behaviour.
    #[serde(default)]
    pub chat: ChatConfig,
}

impl MascotConfig {
    /// Load configuration from a TOML string and validate it.
    ///
    /// # Errors
    /// Returns `MascotError::Config` if the TOML is invalid or fails validation.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(toml_str).map_err(|e| MascotError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, parsed, or validated.
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Check cross-field constraints that serde cannot express.
    ///
    /// # Errors
    /// Returns `MascotError::Config` describing the first violated constraint.
    pub fn validate(&self) -> Result<()> {
        if self.timing.min_display_ms == 0 {
            return Err(MascotError::Config("timing.min_display_ms must be positive".into()));
        }
        if self.idle.timeout_ms == 0 {
            return Err(MascotError::Config("idle.timeout_ms must be positive".into()));
        }
        if self.idle.variants.is_empty() {
            return Err(MascotError::Config("idle.variants must not be empty".into()));
        }
        if self.catalog.asset_extension.is_empty() {
            return Err(MascotError::Config("catalog.asset_extension must not be empty".into()));
        }
        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(MascotError::Config(format!(
                "llm.temperature must be within 0.0..=2.0, got {}",
                self.llm.temperature
            )));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Sub-configs
// ---------------------------------------------------------------------------

/// General system settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Log level: trace, debug, info, warn, error.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Emit JSON log lines instead of human-readable ones.
    #[serde(default)]
    pub json_logs: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            json_logs: false,
        }
    }
}

/// Emotion arbitration timing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimingConfig {
    /// Minimum time an emotion stays on screen before an equal or lower
    /// priority request may replace it.
    #[serde(default = "default_1000")]
    pub min_display_ms: u64,
    /// Host activity signals closer together than this are ignored.
    #[serde(default = "default_1000")]
    pub activity_throttle_ms: u64,
    /// Emotion shown when the controller is created.
    #[serde(default = "default_greeting")]
    pub greeting: Emotion,
}

impl TimingConfig {
    /// Minimum display time as a [`Duration`].
    #[must_use]
    pub fn min_display(&self) -> Duration {
        Duration::from_millis(self.min_display_ms)
    }

    /// Activity throttle window as a [`Duration`].
    #[must_use]
    pub fn activity_throttle(&self) -> Duration {
        Duration::from_millis(self.activity_throttle_ms)
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            min_display_ms: 1000,
            activity_throttle_ms: 1000,
            greeting: default_greeting(),
        }
    }
}

/// Idle-decay policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdleConfig {
    /// Inactivity before an idle variant is picked.
    #[serde(default = "default_10000")]
    pub timeout_ms: u64,
    /// Ambient emotions to choose from, uniformly at random.
    #[serde(default = "default_idle_variants")]
    pub variants: Vec<Emotion>,
    /// Keep cycling idle variants every `timeout_ms` until activity resumes.
    #[serde(default = "default_true")]
    pub repeat: bool,
}

impl IdleConfig {
    /// Idle timeout as a [`Duration`].
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for IdleConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 10_000,
            variants: default_idle_variants(),
            repeat: true,
        }
    }
}

/// Emotion catalog asset layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Directory (or URL prefix) holding the animation files.
    #[serde(default = "default_asset_base")]
    pub asset_base: String,
    /// Animation file extension, without the dot.
    #[serde(default = "default_asset_extension")]
    pub asset_extension: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            asset_base: default_asset_base(),
            asset_extension: default_asset_extension(),
        }
    }
}

/// Chat completion backend settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Provider: "openai" (any OpenAI-compatible API), "ollama", "none".
    #[serde(default = "default_provider")]
    pub provider: String,
    /// Base URL for the API.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Model name.
    #[serde(default = "default_model")]
    pub model: String,
    /// Environment variable holding the API key (never stored in the file).
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    /// Sampling temperature.
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Maximum tokens per reply.
    #[serde(default = "default_1024")]
    pub max_tokens: u32,
    /// Per-request timeout.
    #[serde(default = "default_30000")]
    pub timeout_ms: u64,
    /// Retries after the first failed attempt.
    #[serde(default = "default_1_u32")]
    pub max_retries: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            base_url: default_base_url(),
            model: default_model(),
            api_key_env: default_api_key_env(),
            temperature: default_temperature(),
            max_tokens: 1024,
            timeout_ms: 30_000,
            max_retries: 1,
        }
    }
}

/// Chat session behaviour.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Name the assistant speaks as.
    #[serde(default = "default_persona_name")]
    pub persona_name: String,
    /// Free-form persona description inserted into the system prompt.
    #[serde(default = "default_persona_description")]
    pub persona_description: String,
    /// First assistant message shown before the user says anything.
    #[serde(default = "default_greeting_message")]
    pub greeting_message: String,
    /// Suggested prompts offered to the user.
    #[serde(default = "default_starter_prompts")]
    pub starter_prompts: Vec<String>,
    /// Replies are never shown sooner than this after sending.
    #[serde(default = "default_1500")]
    pub min_reply_delay_ms: u64,
    /// How long the error reaction stays up before reverting to idle.
    #[serde(default = "default_4000")]
    pub error_hold_ms: u64,
    /// Emotion used when a reply carries no animation tag.
    #[serde(default = "default_greeting")]
    pub default_reply_emotion: Emotion,
}

impl ChatConfig {
    /// Minimum reply delay as a [`Duration`].
    #[must_use]
    pub fn min_reply_delay(&self) -> Duration {
        Duration::from_millis(self.min_reply_delay_ms)
    }

    /// Error reaction hold as a [`Duration`].
    #[must_use]
    pub fn error_hold(&self) -> Duration {
        Duration::from_millis(self.error_hold_ms)
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            persona_name: default_persona_name(),
            persona_description: default_persona_description(),
            greeting_message: default_greeting_message(),
            starter_prompts: default_starter_prompts(),
            min_reply_delay_ms: 1500,
            error_hold_ms: 4000,
            default_reply_emotion: default_greeting(),
        }
    }
}

// ---------------------------------------------------------------------------
// Serde default helpers
// ---------------------------------------------------------------------------

fn default_true() -> bool { true }
fn default_log_level() -> String { "info".to_string() }
fn default_greeting() -> Emotion { Emotion::Hellow }
fn default_idle_variants() -> Vec<Emotion> {
    vec![Emotion::Sleeping, Emotion::CoffeeMug, Emotion::CoolWalkWithSnel, Emotion::Idle]
}
fn default_asset_base() -> String { "Animation".to_string() }
fn default_asset_extension() -> String { "lottie".to_string() }
fn default_provider() -> String { "openai".to_string() }
fn default_base_url() -> String { "https://api.groq.com/openai".to_string() }
fn default_model() -> String { "llama-3.3-70b-versatile".to_string() }
fn default_api_key_env() -> String { "MASCOT_API_KEY".to_string() }
fn default_temperature() -> f32 { 0.7 }
fn default_persona_name() -> String { "Mascot".to_string() }
fn default_persona_description() -> String {
    "A witty, casual-professional developer assistant. Short punchy paragraphs, confident but humble.".to_string()
}
fn default_greeting_message() -> String {
    "System initialized. Ask me anything about my projects, skills, or journey as a developer. ⚡".to_string()
}
fn default_starter_prompts() -> Vec<String> {
    vec![
        "Who are you?".to_string(),
        "What are you building right now?".to_string(),
        "Which stack do you enjoy most?".to_string(),
        "Do you like remote work?".to_string(),
    ]
}
fn default_1_u32() -> u32 { 1 }
fn default_1000() -> u64 { 1000 }
fn default_1024() -> u32 { 1024 }
fn default_1500() -> u64 { 1500 }
fn default_4000() -> u64 { 4000 }
fn default_10000() -> u64 { 10_000 }
fn default_30000() -> u64 { 30_000 }
