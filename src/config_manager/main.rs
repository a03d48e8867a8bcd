use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config_manager::stateless_llm::StatelessLLMConfig;
use crate::config_manager::system::SystemConfig;
use crate::config_manager::translation::TranslationConfig;

/// Main configuration for the application (JSON-LD, JSON or YAML)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(rename = "@context")]
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub context: Option<serde_json::Value>,

    #[serde(rename = "system_config")]
    #[serde(default)]
    pub system_config: SystemConfig,

    #[serde(rename = "llm_config")]
    #[serde(default)]
    pub llm_config: StatelessLLMConfig,

    #[serde(rename = "translation_config")]
    #[serde(default)]
    pub translation_config: TranslationConfig,
}

impl Config {
    /// Load configuration from a single file
    pub fn load(path: &str) -> anyhow::Result<Self> {
        use crate::config_manager::utils::{read_config_value, validate_config};
        let value = read_config_value(path)?;
        validate_config(&value)
    }

    /// Try `$CONFIG_PATH` and the usual file names in order, falling back to
    /// defaults when none of them can be read.
    pub fn discover() -> anyhow::Result<Self> {
        let explicit = std::env::var("CONFIG_PATH").ok();
        if let Some(path) = &explicit {
            // An explicit path that fails to load is an error, not a fallback
            let config = Self::load(path)?;
            info!("Loaded configuration from: {}", path);
            return Ok(config);
        }

        for path in ["conf.yaml", "conf.jsonld", "conf.json"] {
            match Self::load(path) {
                Ok(config) => {
                    info!("Loaded configuration from: {}", path);
                    return Ok(config);
                }
                Err(e) => debug!("Failed to load config from {}: {}", path, e),
            }
        }

        info!("No configuration file found, using defaults");
        Ok(Self::default())
    }
}
