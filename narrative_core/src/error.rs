//! Errors that can reach the caller of the engine.
//!
//! Narration failures never appear here: a session always recovers from them
//! with fallback text.

use thiserror::Error;

use crate::session::SessionId;

/// Infrastructure faults surfaced to the transport layer.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("no session with id {0}")]
    SessionNotFound(SessionId),

    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
