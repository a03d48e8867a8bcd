use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info};

use crate::agent::{LlmError, StatelessLLMInterface};
use crate::config_manager::ExpectedLanguage;
use crate::translate::error::TranslateError;
use crate::translate::interface::{retain_non_blank, TranslationRequestItem, TranslationResult};
use crate::translate::parse::results_from_reply;
use crate::translate::prompt::PromptBuilder;

/// Server side of the oracle: one inbound batch, one model call.
pub struct TranslationService {
    llm: Arc<dyn StatelessLLMInterface>,
    prompts: PromptBuilder,
}

impl TranslationService {
    pub fn new(llm: Arc<dyn StatelessLLMInterface>, languages: Vec<ExpectedLanguage>) -> Self {
        Self {
            llm,
            prompts: PromptBuilder::new(languages),
        }
    }

    pub fn expected_languages(&self) -> &[ExpectedLanguage] {
        self.prompts.languages()
    }

    pub fn is_configured(&self) -> bool {
        self.llm.is_configured()
    }

    /// Handle a raw `POST /translate` body.
    ///
    /// The credential check comes first, then body validation, then
    /// [`translate`](Self::translate).
    pub async fn handle_body(&self, body: &[u8]) -> Result<Vec<TranslationResult>, TranslateError> {
        if !self.is_configured() {
            return Err(LlmError::MissingCredential.into());
        }

        let body: Value = serde_json::from_slice(body)
            .map_err(|e| TranslateError::BadRequest(format!("body is not valid JSON: {}", e)))?;
        let batch = Self::parse_batch(&body)?;
        self.translate(batch).await
    }

    /// Validate a raw request body and extract its batch.
    ///
    /// `texts` must be a non-empty array. Elements without a string `value`
    /// are kept as blank items so the blank filter drops them.
    pub fn parse_batch(body: &Value) -> Result<Vec<TranslationRequestItem>, TranslateError> {
        let texts = body
            .get("texts")
            .and_then(Value::as_array)
            .filter(|texts| !texts.is_empty())
            .ok_or_else(|| TranslateError::BadRequest("texts array is required".to_string()))?;

        Ok(texts
            .iter()
            .map(|text| {
                TranslationRequestItem::new(
                    text.get("field").and_then(Value::as_str).unwrap_or_default(),
                    text.get("value").and_then(Value::as_str).unwrap_or_default(),
                )
            })
            .collect())
    }

    /// Detect and translate a batch.
    ///
    /// Returns one result per non-blank item in submission order. Only an
    /// empty batch and model transport failures are errors; unreadable model
    /// output degrades to pass-through results tagged `"en"`.
    pub async fn translate(
        &self,
        batch: Vec<TranslationRequestItem>,
    ) -> Result<Vec<TranslationResult>, TranslateError> {
        if batch.is_empty() {
            return Err(TranslateError::BadRequest(
                "texts array is required".to_string(),
            ));
        }

        let submitted = batch.len();
        let items = retain_non_blank(batch);
        if items.is_empty() {
            debug!("All {} texts were blank, nothing to translate", submitted);
            return Ok(Vec::new());
        }

        let instruction = self.prompts.build(&items);
        info!(
            "Sending {} texts to {} for translation",
            items.len(),
            self.llm.describe()
        );

        let reply = self
            .llm
            .chat_completion(&instruction.system, &instruction.user)
            .await?;
        debug!("Model reply: {}", reply);

        let results = results_from_reply(&reply, &items);
        debug!(
            "Translated {} of {} texts",
            results.iter().filter(|r| r.is_translated).count(),
            results.len()
        );
        Ok(results)
    }
}
