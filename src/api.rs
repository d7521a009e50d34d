//! HTTP API for the triage router
//!
//! The chat front end posts raw user messages here and renders the
//! returned history, category and confidence.

mod handlers;
mod types;

pub use handlers::create_router;
pub use types::*;

use crate::runtime::TriageRouter;
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub router: Arc<TriageRouter>,
}

impl AppState {
    pub fn new(router: Arc<TriageRouter>) -> Self {
        Self { router }
    }
}
