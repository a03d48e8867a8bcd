use async_trait::async_trait;
use reqwest::StatusCode;
use thiserror::Error;

/// Failures of a single model invocation, classified the way callers need
/// to react to them
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("LLM API key is not configured")]
    MissingCredential,

    #[error("Rate limit exceeded. Please try again later.")]
    RateLimited,

    #[error("Service credits exhausted. Please contact support.")]
    QuotaExhausted,

    #[error("Model request timed out")]
    Timeout,

    #[error("AI gateway error: {0}")]
    Upstream(String),

    #[error("Model transport error: {0}")]
    Transport(String),
}

impl LlmError {
    /// Classify a non-success HTTP status from the provider
    pub fn from_status(status: StatusCode, body: &str) -> Self {
        match status {
            StatusCode::TOO_MANY_REQUESTS => LlmError::RateLimited,
            StatusCode::PAYMENT_REQUIRED => LlmError::QuotaExhausted,
            other => LlmError::Upstream(format!("{} {}", other.as_u16(), truncate(body, 200))),
        }
    }
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            LlmError::Timeout
        } else {
            LlmError::Transport(err.to_string())
        }
    }
}

fn truncate(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Interface for a stateless language model
/// Stateless means the LLM doesn't store memory, system prompts, or user messages
#[async_trait]
pub trait StatelessLLMInterface: Send + Sync {
    /// Send one system + user instruction pair and return the full reply text
    async fn chat_completion(&self, system: &str, user: &str) -> Result<String, LlmError>;

    /// Provider/model label for logs
    fn describe(&self) -> String;

    /// Whether the credentials needed for a call are present
    fn is_configured(&self) -> bool {
        true
    }
}
