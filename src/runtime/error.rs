//! Runtime error types

use crate::contracts::{Category, ValidationError};
use crate::llm::LlmError;
use crate::state_machine::TransitionError;
use std::time::Duration;
use thiserror::Error;

/// Failure reported by a classifier or responder
#[derive(Debug, Error)]
pub enum CollaboratorError {
    #[error("{0}")]
    Unavailable(String),
    #[error("timed out after {0:?}")]
    Timeout(Duration),
    /// Output did not match the declared structure
    #[error("{0}")]
    Malformed(String),
}

impl From<LlmError> for CollaboratorError {
    fn from(e: LlmError) -> Self {
        match e.retry_after {
            Some(delay) => CollaboratorError::Unavailable(format!(
                "{} (retry after {}s)",
                e.message,
                delay.as_secs()
            )),
            None => CollaboratorError::Unavailable(e.message),
        }
    }
}

/// Why a turn failed. History keeps the user's message; no reply is added.
#[derive(Debug, Error)]
pub enum RouterError {
    #[error("Intent classifier unavailable: {0}")]
    ClassifierUnavailable(String),
    #[error("{category} responder unavailable: {message}")]
    ResponderUnavailable { category: Category, message: String },
    #[error("Invalid collaborator output: {0}")]
    Validation(#[from] ValidationError),
    #[error("Session {0} is already processing a message")]
    SessionBusy(String),
    #[error(transparent)]
    Transition(#[from] TransitionError),
}

impl RouterError {
    pub fn classifier(error: CollaboratorError) -> Self {
        match error {
            CollaboratorError::Malformed(detail) => {
                RouterError::Validation(ValidationError::Malformed(detail))
            }
            other => RouterError::ClassifierUnavailable(other.to_string()),
        }
    }

    pub fn responder(category: Category, error: CollaboratorError) -> Self {
        match error {
            CollaboratorError::Malformed(detail) => {
                RouterError::Validation(ValidationError::Malformed(detail))
            }
            other => RouterError::ResponderUnavailable {
                category,
                message: other.to_string(),
            },
        }
    }
}
