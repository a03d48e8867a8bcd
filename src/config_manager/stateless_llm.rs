use serde::{Deserialize, Serialize};

pub const API_KEY_ENV: &str = "LLM_API_KEY";

/// Configuration for the model behind the translation oracle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatelessLLMConfig {
    #[serde(rename = "llm_provider")]
    #[serde(default = "default_provider")]
    pub llm_provider: String,

    #[serde(rename = "base_url")]
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(rename = "llm_api_key")]
    #[serde(default)]
    pub llm_api_key: Option<String>,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Only read by the Claude provider
    #[serde(rename = "max_tokens")]
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

fn default_provider() -> String {
    "openai_compatible_llm".to_string()
}

fn default_base_url() -> String {
    "https://ai.gateway.lovable.dev/v1".to_string()
}

fn default_model() -> String {
    "google/gemini-3-flash-preview".to_string()
}

fn default_temperature() -> f32 {
    0.1
}

fn default_max_tokens() -> u32 {
    4096
}

impl StatelessLLMConfig {
    /// The usable API key, if any.
    ///
    /// `LLM_API_KEY` in the environment wins over the file. Blank keys and
    /// `${VAR}` placeholders left behind by a missing environment variable
    /// count as not configured.
    pub fn api_key(&self) -> Option<String> {
        std::env::var(API_KEY_ENV)
            .ok()
            .filter(|k| is_usable_key(k))
            .or_else(|| self.llm_api_key.clone().filter(|k| is_usable_key(k)))
    }
}

fn is_usable_key(key: &str) -> bool {
    let key = key.trim();
    !key.is_empty() && !(key.starts_with("${") && key.ends_with('}'))
}

impl Default for StatelessLLMConfig {
    fn default() -> Self {
        Self {
            llm_provider: default_provider(),
            base_url: default_base_url(),
            llm_api_key: None,
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_keys_are_not_usable() {
        assert!(!is_usable_key("${LLM_API_KEY}"));
        assert!(!is_usable_key("   "));
        assert!(is_usable_key("sk-123"));
    }

    #[test]
    fn partial_config_fills_defaults() {
        let config: StatelessLLMConfig =
            serde_json::from_str(r#"{"model": "gpt-4o-mini"}"#).unwrap();
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.llm_provider, "openai_compatible_llm");
        assert!((config.temperature - 0.1).abs() < f32::EPSILON);
    }
}
