//! Effects produced by state transitions

use crate::contracts::Category;

/// Effects to be executed after a state transition, in order
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Append the user's message to the dialogue history
    AppendUser { text: String },

    /// Append an assistant reply to the dialogue history
    AppendAssistant { text: String },

    /// Update the category and confidence shown next to the conversation
    Display { category: String, confidence: f64 },

    /// Run the intent classifier over the full history
    RequestClassification,

    /// Run the responder for `category` over the full history
    RequestResponse { category: Category },
}

impl Effect {
    pub fn append_user(text: impl Into<String>) -> Self {
        Effect::AppendUser { text: text.into() }
    }

    pub fn append_assistant(text: impl Into<String>) -> Self {
        Effect::AppendAssistant { text: text.into() }
    }

    pub fn display(category: impl Into<String>, confidence: f64) -> Self {
        Effect::Display {
            category: category.into(),
            confidence,
        }
    }

    /// Whether executing this effect suspends on a collaborator
    pub fn is_collaborator_call(&self) -> bool {
        matches!(
            self,
            Effect::RequestClassification | Effect::RequestResponse { .. }
        )
    }
}
