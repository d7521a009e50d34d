//! Runtime for executing triage turns
//!
//! Owns per-session history and state, runs the collaborator calls the state
//! machine asks for, and commits each turn atomically.

mod agents;
mod error;
mod executor;
mod session;
pub mod traits;

#[cfg(test)]
pub mod testing;

pub use agents::{history_to_messages, LlmClassifier, LlmResponder, StructuredAgent};
pub use error::{CollaboratorError, RouterError};
pub use executor::{ClearOutcome, TriageRouter, TurnOutcome};
pub use session::{Session, SessionSnapshot, SessionStore};
pub use traits::*;
