//! Conversation state types

use crate::contracts::{Category, OrderResult};
use serde::{Deserialize, Serialize};

// ============================================================================
// Dialogue History
// ============================================================================

/// Speaker of a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One message in the dialogue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
}

impl Turn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Ordered, append-only sequence of turns
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DialogueHistory {
    turns: Vec<Turn>,
}

impl DialogueHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    /// Empty the history. Only the explicit clear action calls this.
    pub(crate) fn reset(&mut self) {
        self.turns.clear();
    }
}

// ============================================================================
// Conversation State
// ============================================================================

/// Conversation state
///
/// `Idle` and `AwaitingApproval` are the only states a committed session can
/// be in. `Classifying` and `Responding` exist while a turn is in flight.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ConvState {
    /// Ready for a fresh query
    #[default]
    Idle,

    /// User message recorded, classifier call outstanding
    Classifying,

    /// Classified, responder call outstanding
    Responding { category: Category },

    /// An order summary was shown and the next message answers it
    AwaitingApproval { order: OrderResult },
}

impl ConvState {
    /// True while waiting for a yes/no answer to an order summary
    pub fn pending_approval(&self) -> bool {
        matches!(self, ConvState::AwaitingApproval { .. })
    }

    /// True for states a completed turn can leave behind
    pub fn is_stable(&self) -> bool {
        matches!(self, ConvState::Idle | ConvState::AwaitingApproval { .. })
    }

    pub fn name(&self) -> &'static str {
        match self {
            ConvState::Idle => "idle",
            ConvState::Classifying => "classifying",
            ConvState::Responding { .. } => "responding",
            ConvState::AwaitingApproval { .. } => "awaiting_approval",
        }
    }
}
