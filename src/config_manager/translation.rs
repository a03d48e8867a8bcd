use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A language the oracle is told to expect besides English
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpectedLanguage {
    pub code: String,
    pub name: String,
}

impl ExpectedLanguage {
    pub fn new(code: &str, name: &str) -> Self {
        Self {
            code: code.to_string(),
            name: name.to_string(),
        }
    }
}

/// Settings shared by the translate endpoint and its HTTP client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationConfig {
    #[serde(rename = "expected_languages")]
    #[serde(default = "default_expected_languages")]
    pub expected_languages: Vec<ExpectedLanguage>,

    /// Base URL the client posts `/translate` to
    #[serde(rename = "service_url")]
    #[serde(default = "default_service_url")]
    pub service_url: String,

    #[serde(rename = "client_timeout_secs")]
    #[serde(default = "default_client_timeout_secs")]
    pub client_timeout_secs: u64,

    /// Sent as both `Authorization: Bearer` and `apikey`
    #[serde(rename = "api_key")]
    #[serde(default)]
    pub api_key: Option<String>,
}

pub fn default_expected_languages() -> Vec<ExpectedLanguage> {
    vec![
        ExpectedLanguage::new("hi", "Hindi"),
        ExpectedLanguage::new("kn", "Kannada"),
        ExpectedLanguage::new("te", "Telugu"),
        ExpectedLanguage::new("ta", "Tamil"),
        ExpectedLanguage::new("ml", "Malayalam"),
        ExpectedLanguage::new("mr", "Marathi"),
        ExpectedLanguage::new("bn", "Bengali"),
        ExpectedLanguage::new("gu", "Gujarati"),
        ExpectedLanguage::new("pa", "Punjabi"),
        ExpectedLanguage::new("or", "Odia"),
        ExpectedLanguage::new("as", "Assamese"),
        ExpectedLanguage::new("ur", "Urdu"),
    ]
}

fn default_service_url() -> String {
    "http://localhost:8787".to_string()
}

fn default_client_timeout_secs() -> u64 {
    20
}

impl TranslationConfig {
    pub fn client_timeout(&self) -> Duration {
        Duration::from_secs(self.client_timeout_secs.max(1))
    }
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            expected_languages: default_expected_languages(),
            service_url: default_service_url(),
            client_timeout_secs: default_client_timeout_secs(),
            api_key: None,
        }
    }
}
