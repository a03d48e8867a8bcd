//! Shared fakes for the integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use regex::Regex;
use serde_json::json;

use translate_bridge::agent::{LlmError, StatelessLLMInterface};
use translate_bridge::config_manager::Config;
use translate_bridge::state::AppState;

pub enum Behaviour {
    /// Translate known inputs, pass everything else through as English
    Dictionary(HashMap<String, (String, String)>),
    /// Answer every call with this text
    Reply(String),
    /// Fail every call
    Fail(fn() -> LlmError),
}

/// In-process model that records every instruction it receives
pub struct FakeLlm {
    behaviour: Behaviour,
    configured: bool,
    calls: Mutex<Vec<String>>,
}

impl FakeLlm {
    pub fn new(behaviour: Behaviour) -> Arc<Self> {
        Arc::new(Self {
            behaviour,
            configured: true,
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn unconfigured() -> Arc<Self> {
        Arc::new(Self {
            behaviour: Behaviour::Reply("[]".to_string()),
            configured: false,
            calls: Mutex::new(Vec::new()),
        })
    }

    /// Knows the Hindi bio used across the tests
    pub fn hindi() -> Arc<Self> {
        let mut dictionary = HashMap::new();
        dictionary.insert(
            "मैं एक अनुभवी रसोइया हूँ".to_string(),
            ("hi".to_string(), "I am an experienced cook".to_string()),
        );
        dictionary.insert(
            "पुणे".to_string(),
            ("mr".to_string(), "Pune".to_string()),
        );
        dictionary.insert(
            "मुझे कल सफाई के लिए किसी की ज़रूरत है".to_string(),
            ("hi".to_string(), "I need someone for cleaning tomorrow".to_string()),
        );
        Self::new(Behaviour::Dictionary(dictionary))
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn last_user_instruction(&self) -> Option<String> {
        self.calls.lock().unwrap().last().cloned()
    }
}

/// `(index, value)` pairs listed in a user instruction
pub fn listed_items(user: &str) -> Vec<(u64, String)> {
    let line = Regex::new(r#"^\[(\d+)\] [^:]*: (".*")$"#).unwrap();
    user.lines()
        .filter_map(|l| line.captures(l))
        .map(|c| {
            (
                c[1].parse().unwrap(),
                serde_json::from_str::<String>(&c[2]).unwrap(),
            )
        })
        .collect()
}

#[async_trait]
impl StatelessLLMInterface for FakeLlm {
    async fn chat_completion(&self, _system: &str, user: &str) -> Result<String, LlmError> {
        self.calls.lock().unwrap().push(user.to_string());
        match &self.behaviour {
            Behaviour::Reply(text) => Ok(text.clone()),
            Behaviour::Fail(make) => Err(make()),
            Behaviour::Dictionary(dictionary) => {
                let entries: Vec<_> = listed_items(user)
                    .into_iter()
                    .map(|(index, value)| match dictionary.get(&value) {
                        Some((lang, english)) => json!({
                            "index": index,
                            "detectedLanguage": lang,
                            "translated": english,
                            "isTranslated": true
                        }),
                        None => json!({
                            "index": index,
                            "detectedLanguage": "en",
                            "translated": value,
                            "isTranslated": false
                        }),
                    })
                    .collect();
                Ok(format!("```json\n{}\n```", serde_json::to_string_pretty(&entries).unwrap()))
            }
        }
    }

    fn describe(&self) -> String {
        "fake".to_string()
    }

    fn is_configured(&self) -> bool {
        self.configured
    }
}

pub fn state_with(llm: Arc<FakeLlm>) -> AppState {
    AppState::with_llm(Config::default(), llm)
}
