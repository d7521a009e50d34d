//! Common types for LLM interactions

use serde_json::Value;

/// LLM request
#[derive(Debug, Clone)]
pub struct LlmRequest {
    pub system: String,
    pub messages: Vec<LlmMessage>,
    /// Ask the model to answer with JSON matching this schema
    pub response_format: Option<ResponseFormat>,
}

impl LlmRequest {
    pub fn new(system: impl Into<String>, messages: Vec<LlmMessage>) -> Self {
        Self {
            system: system.into(),
            messages,
            response_format: None,
        }
    }

    pub fn with_response_format(mut self, format: ResponseFormat) -> Self {
        self.response_format = Some(format);
        self
    }
}

/// Message in conversation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LlmMessage {
    pub role: MessageRole,
    pub content: String,
}

/// Message role
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageRole {
    User,
    Assistant,
}

/// Named JSON schema for structured output
#[derive(Debug, Clone)]
pub struct ResponseFormat {
    pub name: String,
    pub schema: Value,
}

impl ResponseFormat {
    pub fn new(name: impl Into<String>, schema: Value) -> Self {
        Self {
            name: name.into(),
            schema,
        }
    }
}

/// LLM response
#[derive(Debug, Clone)]
pub struct LlmResponse {
    pub text: String,
    pub usage: Usage,
}

/// Usage statistics
#[derive(Debug, Clone, Default)]
pub struct Usage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}
