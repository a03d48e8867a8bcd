use std::sync::Arc;

use crate::agent::{StatelessLLMFactory, StatelessLLMInterface};
use crate::config_manager::Config;
use crate::translate::TranslationService;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub translator: Arc<TranslationService>,
}

impl AppState {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let llm = StatelessLLMFactory::create_llm(
            &config.llm_config,
            config.system_config.model_timeout(),
        )?;
        Ok(Self::with_llm(config, llm))
    }

    /// Build state around an already constructed model
    pub fn with_llm(config: Config, llm: Arc<dyn StatelessLLMInterface>) -> Self {
        let translator = Arc::new(TranslationService::new(
            llm,
            config.translation_config.expected_languages.clone(),
        ));
        Self {
            config: Arc::new(config),
            translator,
        }
    }
}
