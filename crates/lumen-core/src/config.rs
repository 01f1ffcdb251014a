//! Configuration loading and parsing for Lumen.
//!
//! Provides functionality to load and parse `lumen.toml` configuration
//! files.

use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use crate::rules::{Confidence, Severity};

pub const CONFIG_FILENAME: &str = "lumen.toml";

const KNOWN_TOP_LEVEL_KEYS: &[&str] = &["rules"];
const KNOWN_RULES_KEYS: &[&str] = &[
    "disabled",
    "severity",
    "quality",
    "security",
    "min_confidence",
];

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid TOML in '{path}': {message}")]
    ParseError { path: PathBuf, message: String },
}

#[derive(Debug, Clone, Default)]
pub struct ConfigResult {
    pub config: Config,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub rules: RulesConfig,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct RulesConfig {
    pub disabled: Vec<String>,
    #[serde(default)]
    pub severity: HashMap<String, SeverityValue>,
    pub quality: Option<bool>,
    pub security: Option<bool>,
    pub min_confidence: Option<ConfidenceValue>,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum SeverityValue {
    Error,
    Warning,
    Info,
    Hint,
}

impl From<SeverityValue> for Severity {
    fn from(value: SeverityValue) -> Self {
        match value {
            SeverityValue::Error => Severity::Error,
            SeverityValue::Warning => Severity::Warning,
            SeverityValue::Info => Severity::Info,
            SeverityValue::Hint => Severity::Hint,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceValue {
    High,
    Medium,
    Low,
}

impl From<ConfidenceValue> for Confidence {
    fn from(value: ConfidenceValue) -> Self {
        match value {
            ConfidenceValue::High => Confidence::High,
            ConfidenceValue::Medium => Confidence::Medium,
            ConfidenceValue::Low => Confidence::Low,
        }
    }
}

pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();
    loop {
        let config_path = current.join(CONFIG_FILENAME);
        if config_path.exists() {
            return Some(config_path);
        }
        if !current.pop() {
            return None;
        }
    }
}

pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;

    toml::from_str(&content).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        message: e.message().to_string(),
    })
}

pub fn load_config_with_warnings(path: &Path) -> Result<ConfigResult, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;

    let config: Config = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        message: e.message().to_string(),
    })?;

    let warnings = detect_unknown_keys(&content);

    Ok(ConfigResult { config, warnings })
}

pub fn load_config_or_default(start_dir: &Path) -> Config {
    find_config_file(start_dir)
        .and_then(|path| load_config(&path).ok())
        .unwrap_or_default()
}

fn detect_unknown_keys(content: &str) -> Vec<String> {
    let mut warnings = Vec::new();

    let table: toml::Table = match content.parse() {
        Ok(t) => t,
        Err(_) => return warnings,
    };

    let known_top: HashSet<&str> = KNOWN_TOP_LEVEL_KEYS.iter().copied().collect();
    for key in table.keys() {
        if !known_top.contains(key.as_str()) {
            warnings.push(format!("Unknown config option: '{}'", key));
        }
    }

    if let Some(toml::Value::Table(rules)) = table.get("rules") {
        let known_rules: HashSet<&str> = KNOWN_RULES_KEYS.iter().copied().collect();
        for key in rules.keys() {
            if !known_rules.contains(key.as_str()) {
                warnings.push(format!("Unknown config option in [rules]: '{}'", key));
            }
        }
    }

    warnings
}
