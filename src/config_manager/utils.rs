use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use anyhow::Result;
use regex::Regex;
use serde_json::Value;

use crate::config_manager::main::Config;

fn env_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\$\{(\w+)\}").expect("valid env pattern"))
}

/// Read a configuration file as a JSON value, after `${VAR}` substitution.
///
/// `.json`/`.jsonld` files are parsed as JSON, everything else as YAML.
pub fn read_config_value(config_path: &str) -> Result<Value> {
    if !Path::new(config_path).exists() {
        anyhow::bail!("Configuration file not found: {}", config_path);
    }

    let content = load_text_file_with_guess_encoding(config_path)?;
    if content.trim().is_empty() {
        anyhow::bail!("Configuration file is empty: {}", config_path);
    }

    let content = substitute_env_vars(&content);

    let path_lower = config_path.to_lowercase();
    if path_lower.ends_with(".jsonld") || path_lower.ends_with(".json") {
        Ok(serde_json::from_str(&content)?)
    } else {
        Ok(serde_yaml::from_str(&content)?)
    }
}

/// Replace `${VAR}` with the variable's value; unknown variables are kept verbatim.
pub fn substitute_env_vars(content: &str) -> String {
    env_pattern()
        .replace_all(content, |caps: &regex::Captures| {
            std::env::var(&caps[1]).unwrap_or_else(|_| caps[0].to_string())
        })
        .into_owned()
}

/// Validate configuration data against the Config model
pub fn validate_config(config_data: &Value) -> Result<Config> {
    let config: Config = serde_json::from_value(config_data.clone())?;
    if config.translation_config.expected_languages.is_empty() {
        anyhow::bail!("translation_config.expected_languages must not be empty");
    }
    Ok(config)
}

/// Load text file, stripping a UTF-8 BOM and decoding GBK when the bytes are not UTF-8
pub fn load_text_file_with_guess_encoding(file_path: &str) -> Result<String> {
    let mut buffer = fs::read(file_path)?;
    if buffer.starts_with(&[0xEF, 0xBB, 0xBF]) {
        buffer.drain(0..3);
    }

    match String::from_utf8(buffer) {
        Ok(content) => Ok(content),
        Err(e) => {
            let (cow, _, _) = encoding_rs::GBK.decode(e.as_bytes());
            Ok(cow.into_owned())
        }
    }
}
