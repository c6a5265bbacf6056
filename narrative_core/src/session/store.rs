//! Session store - isolates games by session id.

use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

use super::{DebugSnapshot, Session, SessionId, StoryResponse};
use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::narration::{NarrationClient, Narrator};

/// All live sessions. Each session owns its own state; nothing is shared
/// between them except configuration and the narration client.
#[derive(Debug)]
pub struct SessionStore {
    sessions: HashMap<SessionId, Session>,
    config: EngineConfig,
    narrator: Option<Narrator>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl SessionStore {
    /// A store whose sessions run without a narrator.
    pub fn new(config: EngineConfig) -> Self {
        Self {
            sessions: HashMap::new(),
            config,
            narrator: None,
        }
    }

    /// Narrate new sessions with `client`, bounded by the configured timeout.
    pub fn with_client(mut self, client: Arc<dyn NarrationClient>) -> Self {
        self.narrator = Some(Narrator::new(client, self.config.narration.timeout()));
        self
    }

    /// Open a new session and return its id.
    pub fn create(&mut self) -> SessionId {
        let session = Session::new(self.config.clone(), self.narrator.clone());
        let id = session.id();
        self.sessions.insert(id, session);
        info!(session = %id, live = self.sessions.len(), "Session created");
        id
    }

    pub async fn respond(&mut self, id: SessionId, input: &str) -> Result<StoryResponse, EngineError> {
        Ok(self.session_mut(id)?.respond(input).await)
    }

    pub async fn start_new_game(&mut self, id: SessionId) -> Result<StoryResponse, EngineError> {
        Ok(self.session_mut(id)?.start_new_game().await)
    }

    /// Debug snapshot of a session; `Ok(None)` when debug output is disabled.
    pub fn debug_snapshot(&self, id: SessionId) -> Result<Option<DebugSnapshot>, EngineError> {
        Ok(self.get(id)?.debug_snapshot())
    }

    /// Close a session, returning its final state.
    pub fn remove(&mut self, id: SessionId) -> Result<Session, EngineError> {
        let session = self
            .sessions
            .remove(&id)
            .ok_or(EngineError::SessionNotFound(id))?;
        info!(session = %id, "Session removed");
        Ok(session)
    }

    pub fn get(&self, id: SessionId) -> Result<&Session, EngineError> {
        self.sessions.get(&id).ok_or(EngineError::SessionNotFound(id))
    }

    fn session_mut(&mut self, id: SessionId) -> Result<&mut Session, EngineError> {
        self.sessions
            .get_mut(&id)
            .ok_or(EngineError::SessionNotFound(id))
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
