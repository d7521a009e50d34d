//! API request and response types

use serde::{Deserialize, Serialize};

/// Request to send a chat message
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub text: String,
}

/// Response for session creation
#[derive(Debug, Serialize)]
pub struct SessionCreatedResponse {
    pub session_id: String,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
