//! `OpenAI` chat completions provider with JSON-schema structured output

use super::types::{LlmMessage, LlmRequest, LlmResponse, MessageRole, Usage};
use super::{LlmError, LlmService};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const OPENAI_CHAT_URL: &str = "https://api.openai.com/v1/chat/completions";

/// OpenAI-compatible service implementation
pub struct OpenAIService {
    client: Client,
    api_key: String,
    base_url: String,
    model_id: String,
}

impl OpenAIService {
    pub fn new(
        api_key: String,
        model_id: impl Into<String>,
        gateway: Option<&str>,
        request_timeout: Duration,
    ) -> Result<Self, LlmError> {
        let base_url = match gateway {
            Some(gw) => format!("{}/openai/v1/chat/completions", gw.trim_end_matches('/')),
            None => OPENAI_CHAT_URL.to_string(),
        };

        let client = Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| LlmError::unknown(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key,
            base_url,
            model_id: model_id.into(),
        })
    }

    fn translate_request(&self, request: &LlmRequest) -> OpenAIRequest {
        let mut messages = Vec::with_capacity(request.messages.len() + 1);

        if !request.system.is_empty() {
            messages.push(OpenAIMessage {
                role: "system".to_string(),
                content: request.system.clone(),
            });
        }
        messages.extend(request.messages.iter().map(Self::translate_message));

        let response_format = request.response_format.as_ref().map(|f| OpenAIResponseFormat {
            r#type: "json_schema".to_string(),
            json_schema: OpenAIJsonSchema {
                name: f.name.clone(),
                schema: f.schema.clone(),
                strict: true,
            },
        });

        OpenAIRequest {
            model: self.model_id.clone(),
            messages,
            response_format,
        }
    }

    fn translate_message(msg: &LlmMessage) -> OpenAIMessage {
        let role = match msg.role {
            MessageRole::User => "user",
            MessageRole::Assistant => "assistant",
        };
        OpenAIMessage {
            role: role.to_string(),
            content: msg.content.clone(),
        }
    }

    fn normalize_response(resp: OpenAIResponse) -> Result<LlmResponse, LlmError> {
        let choice = resp
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::unknown("No choices in response"))?;

        if let Some(refusal) = choice.message.refusal {
            return Err(LlmError::invalid_request(format!("Model refused: {refusal}")));
        }

        let text = choice
            .message
            .content
            .filter(|t| !t.is_empty())
            .ok_or_else(|| LlmError::unknown("Empty content in response"))?;

        Ok(LlmResponse {
            text,
            usage: Usage {
                input_tokens: u64::from(resp.usage.prompt_tokens),
                output_tokens: u64::from(resp.usage.completion_tokens),
            },
        })
    }
}

#[async_trait]
impl LlmService for OpenAIService {
    async fn complete(&self, request: &LlmRequest) -> Result<LlmResponse, LlmError> {
        let openai_request = self.translate_request(request);

        let response = self
            .client
            .post(&self.base_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&openai_request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LlmError::network(format!("Request timeout: {e}"))
                } else if e.is_connect() {
                    LlmError::network(format!("Connection failed: {e}"))
                } else {
                    LlmError::unknown(format!("Request failed: {e}"))
                }
            })?;

        let status = response.status();
        let retry_after = response
            .headers()
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok())
            .map(Duration::from_secs);
        let body = response
            .text()
            .await
            .map_err(|e| LlmError::network(format!("Failed to read response: {e}")))?;

        if !status.is_success() {
            let error = LlmError::from_status(status.as_u16(), &body);
            return Err(match retry_after {
                Some(delay) => error.with_retry_after(delay),
                None => error,
            });
        }

        let parsed: OpenAIResponse = serde_json::from_str(&body)
            .map_err(|e| LlmError::unknown(format!("Failed to parse response: {e}")))?;

        Self::normalize_response(parsed)
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Serialize)]
struct OpenAIRequest {
    model: String,
    messages: Vec<OpenAIMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<OpenAIResponseFormat>,
}

#[derive(Debug, Serialize)]
struct OpenAIMessage {
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct OpenAIResponseFormat {
    r#type: String,
    json_schema: OpenAIJsonSchema,
}

#[derive(Debug, Serialize)]
struct OpenAIJsonSchema {
    name: String,
    schema: serde_json::Value,
    strict: bool,
}

#[derive(Debug, Deserialize)]
struct OpenAIResponse {
    choices: Vec<OpenAIChoice>,
    #[serde(default)]
    usage: OpenAIUsage,
}

#[derive(Debug, Deserialize)]
struct OpenAIChoice {
    message: OpenAIResponseMessage,
}

#[derive(Debug, Deserialize)]
struct OpenAIResponseMessage {
    content: Option<String>,
    #[serde(default)]
    refusal: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct OpenAIUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
}
