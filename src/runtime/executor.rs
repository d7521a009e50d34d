//! Triage turn executor

use super::error::RouterError;
use super::session::{SessionSnapshot, SessionStore};
use super::traits::{IntentClassifier, ResponderSet};
use crate::state_machine::transition::TransitionError;
use crate::state_machine::{transition, ConvState, DialogueHistory, Effect, Event, Turn};
use serde::Serialize;
use std::sync::Arc;

/// Result of a completed turn, handed to the presentation layer
#[derive(Debug, Clone, Serialize)]
pub struct TurnOutcome {
    pub history: DialogueHistory,
    pub state: ConvState,
    pub display_category: String,
    pub display_confidence: f64,
}

/// Idle display values after a clear
#[derive(Debug, Clone, Default, Serialize)]
pub struct ClearOutcome {
    pub history: DialogueHistory,
    pub display_category: String,
    pub display_confidence: f64,
}

/// Working copy of a session for the duration of one turn.
///
/// Nothing here reaches the session until the whole turn succeeds.
struct TurnDraft {
    history: DialogueHistory,
    state: ConvState,
    display_category: String,
    display_confidence: f64,
    user_appended: bool,
    assistant_appended: bool,
}

impl TurnDraft {
    fn new(history: &DialogueHistory, state: &ConvState) -> Self {
        Self {
            history: history.clone(),
            state: state.clone(),
            display_category: String::new(),
            display_confidence: 0.0,
            user_appended: false,
            assistant_appended: false,
        }
    }

    fn append_user(&mut self, text: String) {
        self.history.push(Turn::user(text));
        self.user_appended = true;
    }

    fn append_assistant(&mut self, text: String) -> Result<(), RouterError> {
        if self.assistant_appended {
            return Err(TransitionError::InvalidTransition(
                "a turn may append only one assistant reply".to_string(),
            )
            .into());
        }
        self.history.push(Turn::assistant(text));
        self.assistant_appended = true;
        Ok(())
    }
}

/// Routes user messages through the classifier and responders
pub struct TriageRouter {
    classifier: Arc<dyn IntentClassifier>,
    responders: ResponderSet,
    sessions: SessionStore,
}

impl TriageRouter {
    pub fn new(classifier: Arc<dyn IntentClassifier>, responders: ResponderSet) -> Self {
        Self {
            classifier,
            responders,
            sessions: SessionStore::new(),
        }
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Process one user message for `session_id`.
    ///
    /// Rejects the call with `SessionBusy` if another turn for the same
    /// session is still running. If the returned future is dropped before
    /// completion, the session is left untouched.
    pub async fn submit_message(
        &self,
        session_id: &str,
        text: impl Into<String>,
    ) -> Result<TurnOutcome, RouterError> {
        let text = text.into();
        let handle = self.sessions.get_or_create(session_id).await;
        let mut session = handle
            .try_lock()
            .map_err(|_| RouterError::SessionBusy(session_id.to_string()))?;

        let was_pending = session.state.pending_approval();
        let mut draft = TurnDraft::new(&session.history, &session.state);

        match self.run_turn(&mut draft, Event::user_message(text.clone())).await {
            Ok(()) if draft.state.is_stable() => {
                tracing::info!(
                    session_id = %session_id,
                    category = %draft.display_category,
                    confidence = draft.display_confidence,
                    confirmation = was_pending,
                    state = draft.state.name(),
                    history_len = draft.history.len(),
                    "Turn completed"
                );

                session.history = draft.history;
                session.state = draft.state;

                Ok(TurnOutcome {
                    history: session.history.clone(),
                    state: session.state.clone(),
                    display_category: draft.display_category,
                    display_confidence: draft.display_confidence,
                })
            }
            Ok(()) => {
                let err = RouterError::from(TransitionError::InvalidTransition(format!(
                    "turn ended in transient state {}",
                    draft.state.name()
                )));
                tracing::error!(session_id = %session_id, error = %err, "Turn failed");
                if draft.user_appended {
                    session.history.push(Turn::user(text));
                }
                Err(err)
            }
            Err(err) => {
                tracing::warn!(session_id = %session_id, error = %err, "Turn failed");
                // Keep the user's message visible; no reply, state unchanged
                if draft.user_appended {
                    session.history.push(Turn::user(text));
                }
                Err(err)
            }
        }
    }

    /// Reset a session to an empty, idle conversation.
    ///
    /// The session stays in the store so a turn that already holds its
    /// handle commits into the live session, not an orphan.
    pub async fn clear(&self, session_id: &str) -> ClearOutcome {
        if let Some(handle) = self.sessions.get(session_id).await {
            handle.lock().await.reset();
            tracing::info!(session_id = %session_id, "Session cleared");
        }
        ClearOutcome::default()
    }

    /// Committed history and state; empty for sessions never seen
    pub async fn snapshot(&self, session_id: &str) -> SessionSnapshot {
        match self.sessions.get(session_id).await {
            Some(handle) => handle.lock().await.snapshot(),
            None => SessionSnapshot::default(),
        }
    }

    /// Feed events through the state machine until no collaborator call is pending
    async fn run_turn(&self, draft: &mut TurnDraft, event: Event) -> Result<(), RouterError> {
        let mut next = Some(event);

        while let Some(event) = next.take() {
            let result = transition(&draft.state, event)?;
            draft.state = result.new_state;

            for effect in result.effects {
                if let Some(follow_up) = self.execute_effect(draft, effect).await? {
                    next = Some(follow_up);
                }
            }
        }

        Ok(())
    }

    async fn execute_effect(
        &self,
        draft: &mut TurnDraft,
        effect: Effect,
    ) -> Result<Option<Event>, RouterError> {
        match effect {
            Effect::AppendUser { text } => {
                draft.append_user(text);
                Ok(None)
            }
            Effect::AppendAssistant { text } => {
                draft.append_assistant(text)?;
                Ok(None)
            }
            Effect::Display {
                category,
                confidence,
            } => {
                draft.display_category = category;
                draft.display_confidence = confidence;
                Ok(None)
            }
            Effect::RequestClassification => {
                let classification = self
                    .classifier
                    .classify(draft.history.turns())
                    .await
                    .map_err(RouterError::classifier)?;
                classification.validate()?;

                tracing::debug!(
                    category = %classification.category,
                    confidence = classification.confidence,
                    reason = %classification.reason,
                    "Intent classified"
                );
                Ok(Some(Event::Classified(classification)))
            }
            Effect::RequestResponse { category } => {
                let result = self
                    .responders
                    .respond(category, draft.history.turns())
                    .await
                    .map_err(|e| RouterError::responder(category, e))?;
                result.validate_for(category)?;

                tracing::debug!(category = %category, "Responder replied");
                Ok(Some(Event::Responded(result)))
            }
        }
    }
}
