//! Instruction builder for the detection + translation call.
//!
//! The expected-language list comes from configuration; nothing here or in
//! the reply parser depends on which languages are in it.

use crate::config_manager::ExpectedLanguage;
use crate::translate::interface::TranslationRequestItem;

/// System + user instruction pair for one batch
#[derive(Debug, Clone)]
pub struct Instruction {
    pub system: String,
    pub user: String,
}

pub struct PromptBuilder {
    languages: Vec<ExpectedLanguage>,
}

impl PromptBuilder {
    pub fn new(languages: Vec<ExpectedLanguage>) -> Self {
        Self { languages }
    }

    pub fn languages(&self) -> &[ExpectedLanguage] {
        &self.languages
    }

    /// Build the instruction for an already filtered batch.
    ///
    /// Item `i` is tagged `[i]`; the model must echo that number back as
    /// `index`.
    pub fn build(&self, items: &[TranslationRequestItem]) -> Instruction {
        let language_names = self
            .languages
            .iter()
            .map(|l| format!("{} ({})", l.name, l.code))
            .collect::<Vec<_>>()
            .join(", ");

        let system = format!(
            "You detect the language of short user-entered texts and translate them to English.\n\
             1. Decide whether each text is written in one of these languages: {language_names}, or in English.\n\
             2. Translate texts in one of those languages to English.\n\
             3. Return English text, including English words written in Roman script, unchanged.\n\
             4. Keep proper nouns, personal names and place names as they are wherever possible.\n\
             Answer with a JSON array only. Do not add any explanation."
        );

        let listing = items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                // JSON-quote the value so embedded quotes and newlines stay inside the entry
                let quoted = serde_json::to_string(&item.value)
                    .unwrap_or_else(|_| format!("\"{}\"", item.value));
                format!("[{}] {}: {}", index, item.field, quoted)
            })
            .collect::<Vec<_>>()
            .join("\n");

        let codes = self
            .languages
            .iter()
            .map(|l| format!("\"{}\"", l.code))
            .chain(std::iter::once("\"en\"".to_string()))
            .collect::<Vec<_>>()
            .join(", ");

        let user = format!(
            "Texts:\n{listing}\n\n\
             Reply with one JSON object per text, in a single array. Each object has:\n\
             - \"index\": the number in brackets\n\
             - \"detectedLanguage\": one of {codes}\n\
             - \"translated\": the English text (the input itself when it is already English)\n\
             - \"isTranslated\": true only if you translated the text\n\n\
             Example: [{{\"index\": 0, \"detectedLanguage\": \"hi\", \"translated\": \"Hello\", \"isTranslated\": true}}]"
        );

        Instruction { system, user }
    }
}
