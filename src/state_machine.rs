//! Core triage state machine
//!
//! Implements the Elm Architecture pattern with pure state transitions.
//! Collaborator calls are requested as effects and their results come back
//! as events, so every transition can be tested without I/O.

mod effect;
pub mod event;
pub mod state;
pub(crate) mod transition;


pub use effect::Effect;
pub use event::Event;
pub use state::{ConvState, DialogueHistory, Role, Turn};
pub use transition::{transition, TransitionError, TransitionResult};
