//! Narration - the seam to the text-generation backend.
//!
//! The engine never depends on a concrete backend. Anything that can turn a
//! prompt into text implements [`NarrationClient`]; the [`Narrator`] wraps a
//! client with the configured time bound. Failures are reported as
//! [`NarrationError`] and are turned into fallback text by the session, so
//! they never reach a caller of the engine.

mod choices;
mod elements;
mod prompts;

pub use choices::*;
pub use elements::*;
pub use prompts::*;

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use crate::config::NarrationConfig;

/// Errors from a narration call.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NarrationError {
    #[error("narration timed out after {0:?}")]
    Timeout(Duration),

    #[error("narration request failed: {0}")]
    Transport(String),

    #[error("narration backend is rate limited")]
    RateLimited,

    #[error("invalid narration response: {0}")]
    InvalidResponse(String),
}

/// Sampling options for a single generation.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationOptions {
    pub max_tokens: u32,
    pub temperature: f32,
    pub stop_sequences: Vec<String>,
}

impl GenerationOptions {
    /// Options for an ordinary story turn.
    pub fn story(config: &NarrationConfig) -> Self {
        Self {
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            stop_sequences: config.stop_sequences.clone(),
        }
    }

    /// Options for the opening scene.
    pub fn opening(config: &NarrationConfig) -> Self {
        Self {
            temperature: config.opening_temperature,
            ..Self::story(config)
        }
    }

    /// Options for story-element generation. No stop sequences, since the
    /// reply spans many lines.
    pub fn story_elements(config: &NarrationConfig) -> Self {
        Self {
            max_tokens: config.elements_max_tokens,
            temperature: config.temperature,
            stop_sequences: Vec::new(),
        }
    }
}

/// A text-generation backend.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NarrationClient: Send + Sync {
    /// Generate text continuing `prompt`.
    async fn generate(&self, prompt: &str, options: &GenerationOptions) -> Result<String, NarrationError>;
}

/// A narration client bounded by a timeout.
#[derive(Clone)]
pub struct Narrator {
    client: Arc<dyn NarrationClient>,
    timeout: Duration,
}

impl std::fmt::Debug for Narrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Narrator").field("timeout", &self.timeout).finish()
    }
}

impl Narrator {
    pub fn new(client: Arc<dyn NarrationClient>, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Generate text, giving up once the timeout elapses. The reply is
    /// trimmed. There is no retry.
    pub async fn generate(&self, prompt: &str, options: &GenerationOptions) -> Result<String, NarrationError> {
        debug!(prompt_len = prompt.len(), max_tokens = options.max_tokens, "Requesting narration");
        let reply = tokio::time::timeout(self.timeout, self.client.generate(prompt, options))
            .await
            .map_err(|_| NarrationError::Timeout(self.timeout))??;
        Ok(reply.trim().to_string())
    }
}
