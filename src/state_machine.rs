//! Core session state machine
//!
//! Implements the Elm Architecture pattern with pure state transitions:
//! `transition` decides, the runtime performs the effects.

pub mod directive;
mod effect;
pub mod event;
pub mod state;
pub(crate) mod transition;

#[cfg(test)]
mod proptests;

pub use effect::{Effect, Reply};
pub use event::{ConfirmAction, Event};
pub use state::{HistoryEntry, Session, SessionState};
pub use transition::{transition, TransitionError};
