//! Parsing and re-alignment of the model's reply.
//!
//! Nothing in here fails: a reply that cannot be read at all yields one
//! pass-through result per item, and items whose entry is missing or
//! ambiguous fall back individually.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use crate::translate::interface::{TranslationRequestItem, TranslationResult};

/// Language tag the service puts on its own fallbacks
pub const SERVICE_FALLBACK_LANGUAGE: &str = "en";

/// One element of the model's JSON array
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelEntry {
    pub index: u64,
    #[serde(default)]
    pub detected_language: Option<String>,
    #[serde(default)]
    pub translated: Option<String>,
    #[serde(default)]
    pub is_translated: Option<bool>,
}

fn fence_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"```(?:json|JSON)?\s*([\s\S]*?)```").expect("valid fence pattern")
    })
}

/// Remove a surrounding fenced code block, if the reply has one
pub fn strip_code_fence(reply: &str) -> &str {
    if reply.contains("```") {
        if let Some(inner) = fence_pattern().captures(reply).and_then(|c| c.get(1)) {
            return inner.as_str().trim();
        }
    }
    reply.trim()
}

/// Parse the reply into model entries.
///
/// The top level must be an array. Elements that are not well-formed
/// entries are dropped here and surface later as missing indices.
pub fn parse_reply(reply: &str) -> Result<Vec<ModelEntry>, serde_json::Error> {
    let elements: Vec<Value> = serde_json::from_str(strip_code_fence(reply))?;
    Ok(elements
        .into_iter()
        .filter_map(|element| serde_json::from_value::<ModelEntry>(element).ok())
        .collect())
}

/// Pass-through results for a whole batch
pub fn fallback_all(items: &[TranslationRequestItem]) -> Vec<TranslationResult> {
    items
        .iter()
        .map(|item| TranslationResult::fallback(item, Some(SERVICE_FALLBACK_LANGUAGE)))
        .collect()
}

/// Match entries to items by index, one result per item in item order
pub fn align(items: &[TranslationRequestItem], entries: &[ModelEntry]) -> Vec<TranslationResult> {
    let mut by_index: HashMap<u64, Vec<&ModelEntry>> = HashMap::new();
    for entry in entries {
        by_index.entry(entry.index).or_default().push(entry);
    }

    items
        .iter()
        .enumerate()
        .map(|(position, item)| match by_index.get(&(position as u64)).map(Vec::as_slice) {
            Some([entry]) => from_entry(item, entry),
            Some(duplicates) => {
                warn!(
                    "Model returned {} entries for index {}; using original text",
                    duplicates.len(),
                    position
                );
                TranslationResult::fallback(item, Some(SERVICE_FALLBACK_LANGUAGE))
            }
            None => {
                warn!("Model reply has no entry for index {}; using original text", position);
                TranslationResult::fallback(item, Some(SERVICE_FALLBACK_LANGUAGE))
            }
        })
        .collect()
}

/// Parse and align in one step, degrading to [`fallback_all`] on unreadable replies
pub fn results_from_reply(reply: &str, items: &[TranslationRequestItem]) -> Vec<TranslationResult> {
    match parse_reply(reply) {
        Ok(entries) => align(items, &entries),
        Err(e) => {
            warn!("Failed to parse model reply: {}", e);
            fallback_all(items)
        }
    }
}

fn from_entry(item: &TranslationRequestItem, entry: &ModelEntry) -> TranslationResult {
    let translated = entry
        .translated
        .as_deref()
        .filter(|t| !t.trim().is_empty())
        .unwrap_or(&item.value)
        .to_string();

    let detected_language = entry
        .detected_language
        .as_deref()
        .map(|code| code.trim().to_lowercase())
        .filter(|code| !code.is_empty())
        .unwrap_or_else(|| SERVICE_FALLBACK_LANGUAGE.to_string());

    // The flag is only believed when the reply is consistent with it
    let is_translated = entry.is_translated.unwrap_or(false)
        && detected_language != "en"
        && translated != item.value;

    TranslationResult {
        field: item.field.clone(),
        original: item.value.clone(),
        translated,
        detected_language: Some(detected_language),
        is_translated,
    }
}
