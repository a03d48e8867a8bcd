//! Stored shape of a translated field: `<field>`, `<field>_original`,
//! `<field>_language`.

use serde_json::{Map, Value};

use crate::translate::interface::TranslationResult;

/// The three sibling values persisted for one translatable field
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProvenanceTriple {
    /// Working (English) value shown in the product
    pub value: Option<String>,
    /// Verbatim user input, only when it differs from `value`
    pub original: Option<String>,
    /// Detected source language, `None` when detection did not happen
    pub language: Option<String>,
}

impl ProvenanceTriple {
    pub fn from_result(result: &TranslationResult) -> Self {
        let original = (result.original != result.translated).then(|| result.original.clone());
        Self {
            value: Some(result.translated.clone()),
            original,
            language: result.detected_language.clone(),
        }
    }

    /// Triple for a submitted field, translated or not.
    ///
    /// Blank input never gets a result from the client; it is stored as an
    /// empty field with no provenance.
    pub fn for_input(raw: &str, result: Option<&TranslationResult>) -> Self {
        match result {
            Some(result) => Self::from_result(result),
            None if raw.trim().is_empty() => Self::default(),
            None => Self {
                value: Some(raw.to_string()),
                original: None,
                language: None,
            },
        }
    }

    pub fn original_key(field: &str) -> String {
        format!("{}_original", field)
    }

    pub fn language_key(field: &str) -> String {
        format!("{}_language", field)
    }

    /// Put all three keys into `patch`. Callers hand the whole patch to a
    /// single store write so the triple is never split.
    pub fn write_into(&self, field: &str, patch: &mut Map<String, Value>) {
        patch.insert(field.to_string(), to_value(&self.value));
        patch.insert(Self::original_key(field), to_value(&self.original));
        patch.insert(Self::language_key(field), to_value(&self.language));
    }

    /// Read a triple back from a stored record
    pub fn read_from(field: &str, record: &Map<String, Value>) -> Self {
        let get = |key: &str| record.get(key).and_then(Value::as_str).map(str::to_string);
        Self {
            value: get(field),
            original: get(&Self::original_key(field)),
            language: get(&Self::language_key(field)),
        }
    }

    /// What the user actually typed
    pub fn user_input(&self) -> Option<&str> {
        self.original.as_deref().or(self.value.as_deref())
    }
}

fn to_value(value: &Option<String>) -> Value {
    value.clone().map(Value::String).unwrap_or(Value::Null)
}
