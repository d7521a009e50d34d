//! LLM-backed classifier and responders

use super::error::CollaboratorError;
use super::traits::{IntentClassifier, Responder, ResponderSet};
use crate::catalog;
use crate::contracts::{
    schema, BookResult, Category, CategoryResult, ClassificationResult, ClothingResult,
    OrderResult, RetentionResult,
};
use crate::llm::{LlmMessage, LlmRequest, LlmService, MessageRole, ResponseFormat};
use crate::state_machine::{Role, Turn};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

/// Convert dialogue history into provider messages
pub fn history_to_messages(history: &[Turn]) -> Vec<LlmMessage> {
    history
        .iter()
        .map(|turn| LlmMessage {
            role: match turn.role {
                Role::User => MessageRole::User,
                Role::Assistant => MessageRole::Assistant,
            },
            content: turn.content.clone(),
        })
        .collect()
}

/// Fixed instructions + output schema, run against the full history
pub struct StructuredAgent {
    name: String,
    instructions: String,
    format: ResponseFormat,
    llm: Arc<dyn LlmService>,
    timeout: Duration,
}

impl StructuredAgent {
    pub fn new(
        name: impl Into<String>,
        instructions: impl Into<String>,
        format: ResponseFormat,
        llm: Arc<dyn LlmService>,
        timeout: Duration,
    ) -> Self {
        Self {
            name: name.into(),
            instructions: instructions.into(),
            format,
            llm,
            timeout,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub async fn run<T: DeserializeOwned>(&self, history: &[Turn]) -> Result<T, CollaboratorError> {
        let request = LlmRequest::new(self.instructions.clone(), history_to_messages(history))
            .with_response_format(self.format.clone());

        let response = timeout(self.timeout, self.llm.complete(&request))
            .await
            .map_err(|_| CollaboratorError::Timeout(self.timeout))??;

        serde_json::from_str(&response.text).map_err(|e| {
            tracing::warn!(agent = %self.name, error = %e, "Structured output did not parse");
            CollaboratorError::Malformed(format!("{}: {e}", self.name))
        })
    }
}

/// Intent classifier backed by a model
pub struct LlmClassifier {
    agent: StructuredAgent,
}

impl LlmClassifier {
    pub fn new(llm: Arc<dyn LlmService>, timeout: Duration) -> Self {
        Self {
            agent: StructuredAgent::new(
                "ClassificationAgent",
                catalog::CLASSIFIER_INSTRUCTIONS,
                ResponseFormat::new("classification", schema::classification()),
                llm,
                timeout,
            ),
        }
    }
}

#[async_trait]
impl IntentClassifier for LlmClassifier {
    async fn classify(&self, history: &[Turn]) -> Result<ClassificationResult, CollaboratorError> {
        self.agent.run(history).await
    }
}

/// Category responder backed by a model
pub struct LlmResponder {
    category: Category,
    agent: StructuredAgent,
}

impl LlmResponder {
    /// `None` for `Unknown`, which has no responder
    pub fn new(category: Category, llm: Arc<dyn LlmService>, timeout: Duration) -> Option<Self> {
        let instructions = catalog::responder_instructions(category)?;
        let schema = schema::response(category)?;
        let name = format!("{}_response", category.label());

        Some(Self {
            category,
            agent: StructuredAgent::new(
                name.clone(),
                instructions,
                ResponseFormat::new(name, schema),
                llm,
                timeout,
            ),
        })
    }

    /// The full dispatch table over one model
    pub fn set(llm: &Arc<dyn LlmService>, timeout: Duration) -> Option<ResponderSet> {
        ResponderSet::from_fn(|category| {
            Self::new(category, llm.clone(), timeout).map(|r| Arc::new(r) as Arc<dyn Responder>)
        })
    }
}

#[async_trait]
impl Responder for LlmResponder {
    async fn respond(&self, history: &[Turn]) -> Result<CategoryResult, CollaboratorError> {
        match self.category {
            Category::Books => self.agent.run::<BookResult>(history).await.map(CategoryResult::Books),
            Category::Clothing => self
                .agent
                .run::<ClothingResult>(history)
                .await
                .map(CategoryResult::Clothing),
            Category::Retention => self
                .agent
                .run::<RetentionResult>(history)
                .await
                .map(CategoryResult::Retention),
            Category::Order => self.agent.run::<OrderResult>(history).await.map(CategoryResult::Order),
            Category::Unknown => Err(CollaboratorError::Unavailable(format!(
                "{} has no category to answer",
                self.agent.name()
            ))),
        }
    }
}
