//! Session runtime executor

use super::traits::{ChatClient, SessionStore, Summarizer};
use super::RuntimeError;
use crate::deck::DeckWriter;
use crate::search::{SearchGateway, SearchResult};
use crate::state_machine::{transition, Effect, Event, Reply, Session};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{mpsc, oneshot};

/// Capability collaborators shared by every session
pub struct Capabilities {
    pub chat: Arc<dyn ChatClient>,
    pub search: Arc<SearchGateway>,
    pub summarizer: Arc<dyn Summarizer>,
    pub deck: Arc<DeckWriter>,
}

/// Work item for a session runtime
#[derive(Debug)]
pub enum SessionCommand {
    /// Run a user event to completion
    Handle {
        event: Event,
        reply_tx: oneshot::Sender<Result<Reply, RuntimeError>>,
    },
    /// Current session contents
    Snapshot { reply_tx: oneshot::Sender<Session> },
    /// Drop the stored session and stop the task
    Close {
        reply_tx: oneshot::Sender<Result<(), RuntimeError>>,
    },
}

/// Owns one session and processes its commands strictly one at a time
pub struct SessionRuntime {
    session_id: String,
    session: Session,
    capabilities: Arc<Capabilities>,
    store: Arc<dyn SessionStore>,
    command_rx: mpsc::Receiver<SessionCommand>,
}

impl SessionRuntime {
    pub fn new(
        session_id: String,
        session: Session,
        capabilities: Arc<Capabilities>,
        store: Arc<dyn SessionStore>,
        command_rx: mpsc::Receiver<SessionCommand>,
    ) -> Self {
        Self {
            session_id,
            session,
            capabilities,
            store,
            command_rx,
        }
    }

    pub async fn run(mut self) {
        tracing::info!(session_id = %self.session_id, "Starting session runtime");

        while let Some(command) = self.command_rx.recv().await {
            match command {
                SessionCommand::Handle { event, reply_tx } => {
                    let kind = event.kind();
                    let result = self.process_event(event).await;
                    if let Err(e) = &result {
                        tracing::info!(
                            session_id = %self.session_id,
                            event = kind,
                            state = %self.session.state,
                            error = %e,
                            "Session event rejected"
                        );
                    }
                    // Caller may have gone away; the session advanced regardless
                    let _ = reply_tx.send(result);
                }
                SessionCommand::Snapshot { reply_tx } => {
                    let _ = reply_tx.send(self.session.clone());
                }
                SessionCommand::Close { reply_tx } => {
                    let result = self
                        .store
                        .remove(&self.session_id)
                        .await
                        .map_err(RuntimeError::Store);
                    let _ = reply_tx.send(result);
                    break;
                }
            }
        }

        tracing::info!(session_id = %self.session_id, "Session runtime stopped");
    }

    /// Feed an event through the machine, executing effects until it settles
    async fn process_event(&mut self, event: Event) -> Result<Reply, RuntimeError> {
        let mut events_to_process = vec![event];
        let mut reply = None;

        while let Some(current_event) = events_to_process.pop() {
            let kind = current_event.kind();
            let result = transition(&self.session, current_event)?;

            let old_state = self.session.state;
            self.session = result.session;
            if old_state != self.session.state {
                tracing::debug!(
                    session_id = %self.session_id,
                    event = kind,
                    from = %old_state,
                    to = %self.session.state,
                    "State transition"
                );
            }

            for effect in result.effects {
                match self.execute_effect(effect).await {
                    EffectOutcome::Event(next) => events_to_process.push(next),
                    EffectOutcome::Reply(r) => reply = Some(r),
                    EffectOutcome::Done => {}
                }
            }
        }

        reply.ok_or(RuntimeError::NoReply)
    }

    async fn execute_effect(&self, effect: Effect) -> EffectOutcome {
        let caps = &self.capabilities;
        match effect {
            Effect::RequestChat { message } => match caps.chat.chat(&message).await {
                Ok(text) => EffectOutcome::Event(Event::ChatReply {
                    user_message: message,
                    text,
                }),
                Err(e) => {
                    tracing::warn!(session_id = %self.session_id, error = %e, "Chat failed");
                    EffectOutcome::Event(Event::ChatFailed {
                        message: format!("Sorry, the assistant is unavailable right now: {e}"),
                    })
                }
            },

            Effect::RunSearch { query } => {
                let results = caps.search.search(&query).await;
                tracing::debug!(
                    session_id = %self.session_id,
                    count = results.len(),
                    failed = results.iter().any(SearchResult::is_error),
                    "Search results received"
                );
                EffectOutcome::Event(Event::SearchComplete { query, results })
            }

            Effect::Summarize { query, results } => {
                let start = Instant::now();
                let summary = caps.summarizer.summarize(&query, &results).await;
                tracing::info!(
                    session_id = %self.session_id,
                    results = results.len(),
                    duration_ms = %start.elapsed().as_millis(),
                    "Summary produced"
                );
                EffectOutcome::Event(Event::SummaryComplete { summary })
            }

            Effect::BuildDeck { summary } => match caps.deck.write(&summary).await {
                Ok(output) => EffectOutcome::Event(Event::DeckWritten {
                    path: output.path,
                    fallback: output.fallback,
                }),
                Err(e) => {
                    tracing::error!(
                        session_id = %self.session_id,
                        error = %e,
                        "Deck generation failed"
                    );
                    EffectOutcome::Event(Event::DeckFailed {
                        message: format!("Failed to generate slide deck: {e}"),
                    })
                }
            },

            Effect::PersistSession => {
                // The in-memory copy stays authoritative if the store is unavailable
                if let Err(e) = self.store.save(&self.session_id, &self.session).await {
                    tracing::error!(
                        session_id = %self.session_id,
                        error = %e,
                        "Failed to persist session"
                    );
                }
                EffectOutcome::Done
            }

            Effect::Respond(reply) => EffectOutcome::Reply(reply),
        }
    }
}

enum EffectOutcome {
    Event(Event),
    Reply(Reply),
    Done,
}
