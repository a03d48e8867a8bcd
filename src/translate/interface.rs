//! Wire types shared by the translate endpoint and its clients

use serde::{Deserialize, Serialize};

/// One free-text field submitted for translation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationRequestItem {
    pub field: String,
    pub value: String,
}

impl TranslationRequestItem {
    pub fn new(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Empty and all-whitespace values are never sent to the oracle
    pub fn is_blank(&self) -> bool {
        self.value.trim().is_empty()
    }
}

/// Drop blank items, keeping the order of the rest
pub fn retain_non_blank(items: Vec<TranslationRequestItem>) -> Vec<TranslationRequestItem> {
    items.into_iter().filter(|item| !item.is_blank()).collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationResult {
    pub field: String,
    pub original: String,
    pub translated: String,
    pub detected_language: Option<String>,
    pub is_translated: bool,
}

impl TranslationResult {
    /// Pass-through result used when translation could not be performed.
    ///
    /// The service tags its fallbacks as `"en"`, the client as `None`.
    pub fn fallback(item: &TranslationRequestItem, detected_language: Option<&str>) -> Self {
        Self {
            field: item.field.clone(),
            original: item.value.clone(),
            translated: item.value.clone(),
            detected_language: detected_language.map(str::to_string),
            is_translated: false,
        }
    }
}

/// Body of `POST /translate`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslateRequest {
    pub texts: Vec<TranslationRequestItem>,
}

/// Success body of `POST /translate`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslateResponse {
    pub results: Vec<TranslationResult>,
}

/// Error body for every non-2xx response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn results_serialize_in_camel_case() {
        let item = TranslationRequestItem::new("city", "Pune");
        let json = serde_json::to_value(TranslationResult::fallback(&item, None)).unwrap();
        assert_eq!(json["detectedLanguage"], serde_json::Value::Null);
        assert_eq!(json["isTranslated"], false);
        assert_eq!(json["translated"], "Pune");
    }

    #[test]
    fn blank_detection_covers_unicode_whitespace() {
        assert!(TranslationRequestItem::new("a", "").is_blank());
        assert!(TranslationRequestItem::new("a", " \t\n\u{3000}").is_blank());
        assert!(!TranslationRequestItem::new("a", " x ").is_blank());
    }

    #[test]
    fn retain_non_blank_keeps_order() {
        let kept = retain_non_blank(vec![
            TranslationRequestItem::new("a", "1"),
            TranslationRequestItem::new("b", "  "),
            TranslationRequestItem::new("c", "3"),
        ]);
        let fields: Vec<_> = kept.iter().map(|i| i.field.as_str()).collect();
        assert_eq!(fields, ["a", "c"]);
    }
}
