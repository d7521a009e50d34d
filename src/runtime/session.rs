//! Session-keyed conversation store

use crate::state_machine::{ConvState, DialogueHistory};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

/// History and state owned by one conversation
#[derive(Debug, Default)]
pub struct Session {
    pub history: DialogueHistory,
    pub state: ConvState,
}

impl Session {
    /// Back to an empty, idle conversation
    pub fn reset(&mut self) {
        self.history.reset();
        self.state = ConvState::Idle;
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            history: self.history.clone(),
            state: self.state.clone(),
        }
    }
}

/// Committed view of a session
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub history: DialogueHistory,
    pub state: ConvState,
}

/// Map from session id to its conversation.
///
/// Each session sits behind its own mutex so turns for different sessions
/// never contend.
#[derive(Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<String, Arc<Mutex<Session>>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty session under a fresh id
    pub async fn create(&self) -> String {
        let id = uuid::Uuid::new_v4().to_string();
        self.sessions
            .write()
            .await
            .insert(id.clone(), Arc::new(Mutex::new(Session::default())));
        id
    }

    /// Get a session, creating it on first use
    pub async fn get_or_create(&self, session_id: &str) -> Arc<Mutex<Session>> {
        {
            let sessions = self.sessions.read().await;
            if let Some(session) = sessions.get(session_id) {
                return session.clone();
            }
        }

        self.sessions
            .write()
            .await
            .entry(session_id.to_string())
            .or_default()
            .clone()
    }

    pub async fn get(&self, session_id: &str) -> Option<Arc<Mutex<Session>>> {
        self.sessions.read().await.get(session_id).cloned()
    }

    pub async fn remove(&self, session_id: &str) -> Option<Arc<Mutex<Session>>> {
        self.sessions.write().await.remove(session_id)
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}
