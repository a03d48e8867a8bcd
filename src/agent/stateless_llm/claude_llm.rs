use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{error, info};

use super::stateless_llm_interface::{LlmError, StatelessLLMInterface};

const ANTHROPIC_VERSION: &str = "2023-06-01";

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    system: &'a str,
    max_tokens: u32,
    temperature: f32,
    messages: Vec<UserMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct UserMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

/// Claude LLM implementation over the Anthropic messages API
pub struct ClaudeLLM {
    client: Client,
    model: String,
    base_url: String,
    api_key: Option<String>,
    temperature: f32,
    max_tokens: u32,
}

impl ClaudeLLM {
    pub fn new(
        base_url: String,
        model: String,
        api_key: Option<String>,
        temperature: f32,
        max_tokens: u32,
        timeout: Duration,
    ) -> Result<Self, LlmError> {
        let client = Client::builder().timeout(timeout).build()?;
        info!("Initialized ClaudeLLM: model={}, base_url={}", model, base_url);
        Ok(Self {
            client,
            model,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            temperature,
            max_tokens,
        })
    }
}

#[async_trait]
impl StatelessLLMInterface for ClaudeLLM {
    async fn chat_completion(&self, system: &str, user: &str) -> Result<String, LlmError> {
        let api_key = self.api_key.as_deref().ok_or(LlmError::MissingCredential)?;

        let request = MessagesRequest {
            model: &self.model,
            system,
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            messages: vec![UserMessage { role: "user", content: user }],
        };

        let response = self
            .client
            .post(format!("{}/v1/messages", self.base_url))
            .header("x-api-key", api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Claude API error: {} {}", status, body);
            return Err(LlmError::from_status(status, &body));
        }

        let body: MessagesResponse = response
            .json()
            .await
            .map_err(|e| LlmError::Upstream(format!("unreadable messages body: {}", e)))?;

        let text: String = body
            .content
            .into_iter()
            .filter(|block| block.kind == "text")
            .filter_map(|block| block.text)
            .collect();

        if text.is_empty() {
            return Err(LlmError::Upstream("No content in AI response".to_string()));
        }
        Ok(text)
    }

    fn describe(&self) -> String {
        format!("claude:{}", self.model)
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}
