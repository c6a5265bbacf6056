//! Engine configuration, loadable from TOML.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::error::EngineError;

/// Settings for calls to the narration collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NarrationConfig {
    /// Upper bound on a single narration call, in milliseconds.
    pub timeout_ms: u64,
    pub max_tokens: u32,
    pub temperature: f32,
    /// Temperature for the opening scene.
    pub opening_temperature: f32,
    /// Token budget for story-element generation.
    pub elements_max_tokens: u32,
    pub stop_sequences: Vec<String>,
}

impl Default for NarrationConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 10_000,
            max_tokens: 150,
            temperature: 0.7,
            opening_temperature: 0.8,
            elements_max_tokens: 300,
            stop_sequences: vec![
                "Player:".to_string(),
                "Response:".to_string(),
                "\n\n".to_string(),
            ],
        }
    }
}

impl NarrationConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Per-session limits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Player input is cut to this many words before processing.
    pub max_input_words: usize,
    /// Story beats kept in the rolling history.
    pub history_limit: usize,
    /// Offered-choice records kept for context.
    pub choice_history_limit: usize,
    /// Whether debug snapshots are returned. Disable in production.
    pub expose_debug: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_input_words: 10,
            history_limit: 20,
            choice_history_limit: 10,
            expose_debug: true,
        }
    }
}

/// Top-level engine configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub narration: NarrationConfig,
    pub session: SessionConfig,
}

impl EngineConfig {
    /// Parse a configuration from TOML text. Missing keys take defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, EngineError> {
        Ok(toml::from_str(text)?)
    }

    /// Load a configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, EngineError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Set the narration timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.narration.timeout_ms = timeout.as_millis() as u64;
        self
    }

    /// Set the input word cap.
    pub fn with_max_input_words(mut self, words: usize) -> Self {
        self.session.max_input_words = words;
        self
    }

    /// Enable or disable debug snapshots.
    pub fn with_debug(mut self, expose: bool) -> Self {
        self.session.expose_debug = expose;
        self
    }
}
