//! Events that can occur during a turn

use crate::contracts::{CategoryResult, ClassificationResult};

/// Events that trigger state transitions
#[derive(Debug, Clone)]
pub enum Event {
    // User events
    UserMessage { text: String },

    // Collaborator events
    Classified(ClassificationResult),
    Responded(CategoryResult),
}

impl Event {
    pub fn user_message(text: impl Into<String>) -> Self {
        Event::UserMessage { text: text.into() }
    }
}
