//! LLM provider abstraction
//!
//! Provides a common interface for requesting structured output from a model.

mod error;
mod openai;
mod types;

pub use error::{LlmError, LlmErrorKind};
pub use openai::OpenAIService;
pub use types::*;

use async_trait::async_trait;
use std::sync::Arc;

/// Common interface for LLM providers
#[async_trait]
pub trait LlmService: Send + Sync {
    /// Make a completion request
    async fn complete(&self, request: &LlmRequest) -> Result<LlmResponse, LlmError>;

    /// Get the model ID
    fn model_id(&self) -> &str;
}

/// Logging wrapper for LLM services
pub struct LoggingService {
    inner: Arc<dyn LlmService>,
    model_id: String,
}

impl LoggingService {
    pub fn new(inner: Arc<dyn LlmService>) -> Self {
        let model_id = inner.model_id().to_string();
        Self { inner, model_id }
    }
}

#[async_trait]
impl LlmService for LoggingService {
    async fn complete(&self, request: &LlmRequest) -> Result<LlmResponse, LlmError> {
        let start = std::time::Instant::now();
        let result = self.inner.complete(request).await;
        let duration = start.elapsed();

        match &result {
            Ok(response) => {
                tracing::info!(
                    model = %self.model_id,
                    schema = request.response_format.as_ref().map_or("none", |f| f.name.as_str()),
                    duration_ms = %duration.as_millis(),
                    input_tokens = response.usage.input_tokens,
                    output_tokens = response.usage.output_tokens,
                    "LLM request completed"
                );
            }
            Err(e) => {
                tracing::error!(
                    model = %self.model_id,
                    duration_ms = %duration.as_millis(),
                    error = %e.message,
                    retryable = e.kind.is_retryable(),
                    retry_after_secs = e.retry_after.map(|d| d.as_secs()),
                    "LLM request failed"
                );
            }
        }

        result
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}

/// Stand-in used when no provider credentials are configured.
///
/// Every request fails with an auth error, so the router reports its
/// collaborators as unavailable instead of refusing to start.
pub struct UnconfiguredService {
    model_id: String,
}

impl UnconfiguredService {
    pub fn new(model_id: impl Into<String>) -> Self {
        Self {
            model_id: model_id.into(),
        }
    }
}

#[async_trait]
impl LlmService for UnconfiguredService {
    async fn complete(&self, _request: &LlmRequest) -> Result<LlmResponse, LlmError> {
        Err(LlmError::auth("No LLM API key configured (set OPENAI_API_KEY)"))
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}
