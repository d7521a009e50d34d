//! Conversational triage router
//!
//! Classifies each customer message into a fixed set of categories, hands it
//! to the matching responder, and runs a yes/no confirmation step before an
//! order is committed.

pub mod api;
pub mod catalog;
pub mod config;
pub mod contracts;
pub mod llm;
pub mod runtime;
pub mod state_machine;
