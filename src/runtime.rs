//! Runtime for executing sessions
//!
//! One task per live session receives commands over a channel and runs each
//! to completion before looking at the next, so a session never sees two
//! events at once while separate sessions proceed concurrently.

mod executor;
pub mod traits;

#[cfg(test)]
pub mod testing;

pub use executor::{Capabilities, SessionCommand, SessionRuntime};
pub use traits::*;

use crate::state_machine::{ConfirmAction, Event, Reply, Session, TransitionError};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot, RwLock};

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("{0}")]
    Rejected(#[from] TransitionError),
    #[error("Session not found: {0}")]
    UnknownSession(String),
    #[error("Session store failed: {0}")]
    Store(String),
    #[error("Session runtime stopped")]
    Stopped,
    #[error("Session produced no reply")]
    NoReply,
}

impl RuntimeError {
    /// Whether the caller asked for something the session cannot do right now
    pub fn is_usage_error(&self) -> bool {
        matches!(self, RuntimeError::Rejected(e) if e.is_usage_error())
    }
}

/// Handle to interact with a running session
#[derive(Clone)]
pub struct SessionHandle {
    pub command_tx: mpsc::Sender<SessionCommand>,
}

/// Manager for all session runtimes
pub struct SessionManager {
    capabilities: Arc<Capabilities>,
    store: Arc<dyn SessionStore>,
    runtimes: RwLock<HashMap<String, SessionHandle>>,
}

impl SessionManager {
    pub fn new(capabilities: Capabilities, store: Arc<dyn SessionStore>) -> Self {
        Self {
            capabilities: Arc::new(capabilities),
            store,
            runtimes: RwLock::new(HashMap::new()),
        }
    }

    /// Start a fresh session and return its id
    pub async fn create_session(&self) -> Result<String, RuntimeError> {
        let session_id = uuid::Uuid::new_v4().to_string();
        self.store
            .save(&session_id, &Session::default())
            .await
            .map_err(RuntimeError::Store)?;
        tracing::info!(session_id = %session_id, "Session created");
        Ok(session_id)
    }

    /// Get or create a runtime for a stored session
    pub async fn get_or_create(&self, session_id: &str) -> Result<SessionHandle, RuntimeError> {
        if let Some(handle) = self.runtimes.read().await.get(session_id) {
            return Ok(handle.clone());
        }

        let mut runtimes = self.runtimes.write().await;
        // Another caller may have started it while we waited for the lock
        if let Some(handle) = runtimes.get(session_id) {
            return Ok(handle.clone());
        }

        let session = self
            .store
            .load(session_id)
            .await
            .map_err(RuntimeError::Store)?
            .ok_or_else(|| RuntimeError::UnknownSession(session_id.to_string()))?;

        let (command_tx, command_rx) = mpsc::channel(32);
        let runtime = SessionRuntime::new(
            session_id.to_string(),
            session,
            self.capabilities.clone(),
            self.store.clone(),
            command_rx,
        );
        tokio::spawn(runtime.run());

        let handle = SessionHandle { command_tx };
        runtimes.insert(session_id.to_string(), handle.clone());
        Ok(handle)
    }

    /// Send a user event and wait for the session to settle
    async fn dispatch(&self, session_id: &str, event: Event) -> Result<Reply, RuntimeError> {
        let handle = self.get_or_create(session_id).await?;
        let (reply_tx, reply_rx) = oneshot::channel();
        handle
            .command_tx
            .send(SessionCommand::Handle { event, reply_tx })
            .await
            .map_err(|_| RuntimeError::Stopped)?;
        reply_rx.await.map_err(|_| RuntimeError::Stopped)?
    }

    pub async fn handle_message(
        &self,
        session_id: &str,
        text: &str,
    ) -> Result<Reply, RuntimeError> {
        self.dispatch(
            session_id,
            Event::UserMessage {
                text: text.to_string(),
            },
        )
        .await
    }

    pub async fn handle_confirmation(
        &self,
        session_id: &str,
        action: ConfirmAction,
        new_query: Option<String>,
    ) -> Result<Reply, RuntimeError> {
        self.dispatch(session_id, Event::confirmation(action, new_query))
            .await
    }

    pub async fn handle_generate_request(&self, session_id: &str) -> Result<Reply, RuntimeError> {
        self.dispatch(session_id, Event::GenerateDeck).await
    }

    pub async fn reset_session(&self, session_id: &str) -> Result<Reply, RuntimeError> {
        self.dispatch(session_id, Event::Reset).await
    }

    /// Stop a session's runtime and forget the session
    ///
    /// Commands already queued for the session finish first.
    pub async fn delete_session(&self, session_id: &str) -> Result<(), RuntimeError> {
        let live = self.runtimes.write().await.remove(session_id);
        match live {
            Some(handle) => {
                let (reply_tx, reply_rx) = oneshot::channel();
                handle
                    .command_tx
                    .send(SessionCommand::Close { reply_tx })
                    .await
                    .map_err(|_| RuntimeError::Stopped)?;
                reply_rx.await.map_err(|_| RuntimeError::Stopped)??;
            }
            None => {
                let stored = self
                    .store
                    .load(session_id)
                    .await
                    .map_err(RuntimeError::Store)?;
                if stored.is_none() {
                    return Err(RuntimeError::UnknownSession(session_id.to_string()));
                }
                self.store
                    .remove(session_id)
                    .await
                    .map_err(RuntimeError::Store)?;
            }
        }

        tracing::info!(session_id = %session_id, "Session deleted");
        Ok(())
    }

    /// Current contents of a session
    pub async fn snapshot(&self, session_id: &str) -> Result<Session, RuntimeError> {
        let handle = self.get_or_create(session_id).await?;
        let (reply_tx, reply_rx) = oneshot::channel();
        handle
            .command_tx
            .send(SessionCommand::Snapshot { reply_tx })
            .await
            .map_err(|_| RuntimeError::Stopped)?;
        reply_rx.await.map_err(|_| RuntimeError::Stopped)
    }
}
