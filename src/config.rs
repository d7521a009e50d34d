//! Runtime configuration from the environment

use std::time::Duration;

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_COLLABORATOR_TIMEOUT: Duration = Duration::from_secs(60);

/// Server and collaborator configuration
#[derive(Debug, Clone)]
pub struct TriageConfig {
    pub openai_api_key: Option<String>,
    /// Gateway base URL (e.g., `http://169.254.169.254/gateway/llm`)
    pub gateway: Option<String>,
    pub model: String,
    pub port: u16,
    /// Upper bound on each classifier or responder call
    pub collaborator_timeout: Duration,
}

impl Default for TriageConfig {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            gateway: None,
            model: DEFAULT_MODEL.to_string(),
            port: DEFAULT_PORT,
            collaborator_timeout: DEFAULT_COLLABORATOR_TIMEOUT,
        }
    }
}

impl TriageConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; unset or unparsable values use defaults
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            openai_api_key: non_empty("OPENAI_API_KEY"),
            gateway: non_empty("LLM_GATEWAY"),
            model: non_empty("TRIAGE_MODEL").unwrap_or(defaults.model),
            port: non_empty("TRIAGE_PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            collaborator_timeout: non_empty("TRIAGE_COLLABORATOR_TIMEOUT_SECS")
                .and_then(|s| s.parse().ok())
                .map_or(defaults.collaborator_timeout, Duration::from_secs),
        }
    }
}
