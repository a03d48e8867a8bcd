use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use anyhow::Result;

use crate::agent::stateless_llm::{ClaudeLLM, OpenAICompatibleLLM, StatelessLLMInterface};
use crate::config_manager::StatelessLLMConfig;

/// Factory for creating stateless LLM instances
pub struct StatelessLLMFactory;

impl StatelessLLMFactory {
    /// Create an LLM based on the configuration.
    ///
    /// A missing API key is not an error here: the model is still built and
    /// every call reports the missing credential, so the server can come up
    /// and answer requests with a proper status.
    pub fn create_llm(
        config: &StatelessLLMConfig,
        timeout: Duration,
    ) -> Result<Arc<dyn StatelessLLMInterface>> {
        info!("Initializing LLM: {}", config.llm_provider);

        let api_key = config.api_key();
        if api_key.is_none() {
            warn!("No LLM API key configured; translation requests will fail with 500");
        }

        match config.llm_provider.as_str() {
            "openai_compatible_llm" | "openai_llm" | "gemini_llm" | "deepseek_llm"
            | "groq_llm" | "mistral_llm" | "ollama_llm" => Ok(Arc::new(OpenAICompatibleLLM::new(
                config.model.clone(),
                config.base_url.clone(),
                api_key,
                config.temperature,
                timeout,
            )?)),
            "claude_llm" => Ok(Arc::new(ClaudeLLM::new(
                config.base_url.clone(),
                config.model.clone(),
                api_key,
                config.temperature,
                config.max_tokens,
                timeout,
            )?)),
            other => Err(anyhow::anyhow!("Unsupported LLM provider: {}", other)),
        }
    }
}
