//! Property-based tests for the state machine
//!
//! A small driver plays the runtime's role: it answers every capability
//! effect with a generated outcome, so whole conversations can be explored.

use super::state::*;
use super::transition::*;
use super::*;
use crate::search::SearchResult;
use proptest::prelude::*;
use std::path::PathBuf;

// ============================================================================
// Generators
// ============================================================================

/// A user-side action plus the canned outcomes its capability calls produce
#[derive(Debug, Clone)]
enum Action {
    Message {
        text: String,
        reply: ChatOutcome,
    },
    Confirm,
    Requery(Option<String>),
    Generate,
    Reset,
}

#[derive(Debug, Clone)]
enum ChatOutcome {
    Plain(String),
    Directive(String),
    Failed,
}

fn arb_chat_outcome() -> impl Strategy<Value = ChatOutcome> {
    prop_oneof![
        "[a-zA-Z ]{0,30}".prop_map(ChatOutcome::Plain),
        "[a-zA-Z ]{0,20}".prop_map(ChatOutcome::Directive),
        Just(ChatOutcome::Failed),
    ]
}

fn arb_action() -> impl Strategy<Value = Action> {
    prop_oneof![
        3 => ("[a-z ]{0,20}", arb_chat_outcome())
            .prop_map(|(text, reply)| Action::Message { text, reply }),
        2 => Just(Action::Confirm),
        1 => proptest::option::of("[a-z ]{0,12}").prop_map(Action::Requery),
        2 => Just(Action::Generate),
        1 => Just(Action::Reset),
    ]
}

fn arb_results() -> impl Strategy<Value = Vec<SearchResult>> {
    proptest::collection::vec(
        ("[a-zA-Z]{1,10}", "[a-z ]{0,20}").prop_map(|(title, snippet)| SearchResult {
            title,
            snippet,
            link: String::new(),
        }),
        0..4,
    )
}

fn arb_session() -> impl Strategy<Value = Session> {
    (
        prop_oneof![
            Just(SessionState::Idle),
            Just(SessionState::Searching),
            Just(SessionState::AwaitingConfirm),
            Just(SessionState::Summarized),
        ],
        "[a-z ]{0,10}",
        arb_results(),
        "[a-z\n -]{0,30}",
        proptest::collection::vec("[a-z]{1,8}", 0..4),
    )
        .prop_map(|(state, last_query, last_results, last_summary, lines)| {
            let mut session = Session {
                state,
                last_query,
                last_results,
                last_summary,
                ..Session::default()
            };
            for line in lines {
                session.push_user(line);
            }
            session
        })
}

// ============================================================================
// Driver
// ============================================================================

fn user_event(action: &Action) -> Event {
    match action {
        Action::Message { text, .. } => Event::UserMessage { text: text.clone() },
        Action::Confirm => Event::Confirm,
        Action::Requery(query) => Event::Requery {
            query: query.clone(),
        },
        Action::Generate => Event::GenerateDeck,
        Action::Reset => Event::Reset,
    }
}

/// Answer one effect the way a capability would
fn outcome(
    effect: &Effect,
    action: &Action,
    results: &[SearchResult],
    summary: &str,
) -> Option<Event> {
    match effect {
        Effect::RequestChat { message } => {
            let Action::Message { reply, .. } = action else {
                return None;
            };
            Some(match reply {
                ChatOutcome::Plain(text) => Event::ChatReply {
                    user_message: message.clone(),
                    text: text.replace(':', " "),
                },
                ChatOutcome::Directive(query) => Event::ChatReply {
                    user_message: message.clone(),
                    text: format!("Let me look. search: {query}"),
                },
                ChatOutcome::Failed => Event::ChatFailed {
                    message: "[Chat error] unavailable".to_string(),
                },
            })
        }
        Effect::RunSearch { query } => Some(Event::SearchComplete {
            query: query.clone(),
            results: results.to_vec(),
        }),
        Effect::Summarize { .. } => Some(Event::SummaryComplete {
            summary: summary.to_string(),
        }),
        Effect::BuildDeck { .. } => Some(Event::DeckWritten {
            path: PathBuf::from("outputs/presentation.pptx"),
            fallback: false,
        }),
        Effect::PersistSession | Effect::Respond(_) => None,
    }
}

fn check_invariants(session: &Session) -> Result<(), TestCaseError> {
    if !session.last_summary.is_empty() {
        prop_assert_eq!(session.state, SessionState::Summarized);
    }
    if !session.last_results.is_empty() {
        prop_assert!(matches!(
            session.state,
            SessionState::AwaitingConfirm | SessionState::Summarized
        ));
    }
    Ok(())
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn conversations_preserve_invariants(
        actions in proptest::collection::vec(arb_action(), 1..25),
        results in arb_results(),
        summary in "[a-z\n -]{0,40}",
    ) {
        let mut session = Session::default();
        for action in &actions {
            let before = session.clone();
            let mut next_event = Some(user_event(action));
            let mut first = true;

            while let Some(event) = next_event.take() {
                match transition(&session, event) {
                    Ok(result) => {
                        session = result.session;
                        check_invariants(&session)?;
                        for effect in &result.effects {
                            if let Some(e) = outcome(effect, action, &results, &summary) {
                                next_event = Some(e);
                            }
                        }
                    }
                    Err(err) => {
                        // Only the user's own event may be rejected, and only as a usage error
                        prop_assert!(first, "capability outcome rejected: {err}");
                        prop_assert!(err.is_usage_error(), "unexpected error: {err}");
                        prop_assert_eq!(&session, &before);
                    }
                }
                first = false;
            }

            // Events are handled to completion: never left mid-search
            prop_assert_ne!(session.state, SessionState::Searching);

            if matches!(action, Action::Reset) {
                prop_assert!(session.history.is_empty());
            } else {
                prop_assert!(session.history.len() >= before.history.len());
            }
        }
    }

    #[test]
    fn reset_always_returns_to_idle(session in arb_session()) {
        let result = transition(&session, Event::Reset).unwrap();
        prop_assert_eq!(result.session.state, SessionState::Idle);
        prop_assert!(result.session.history.is_empty());
        prop_assert!(result.session.last_query.is_empty());
        prop_assert!(result.session.last_results.is_empty());
        prop_assert!(result.session.last_summary.is_empty());
    }

    #[test]
    fn user_events_fail_only_with_usage_errors(
        session in arb_session(),
        action in arb_action(),
    ) {
        if let Err(err) = transition(&session, user_event(&action)) {
            prop_assert!(err.is_usage_error(), "unexpected error: {err}");
        }
    }

    #[test]
    fn searching_rejects_user_events_as_busy(
        session in arb_session(),
        action in arb_action(),
    ) {
        prop_assume!(!matches!(action, Action::Reset));
        let searching = Session { state: SessionState::Searching, ..session };
        let err = transition(&searching, user_event(&action)).unwrap_err();
        prop_assert_eq!(err, TransitionError::Busy);
    }
}
