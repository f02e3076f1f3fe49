//! Linter configuration and the per-rule severity/config model.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::diagnostic::Severity;

/// Invalid configuration supplied through the API or an inline
/// configuration comment.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid severity: {0}")]
    InvalidSeverity(String),
    #[error("rule \"{0}\" doesn't exist")]
    UnknownRule(String),
    #[error("invalid config for rule \"{rule}\": {message}")]
    InvalidRuleConfig { rule: String, message: String },
    #[error("rules configuration must be an object")]
    InvalidRulesObject,
}

/// Configuration of a single rule: a severity alone, or an array of the
/// severity followed by rule-specific parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RuleConfigValue {
    Severity(Severity),
    Tuple(Vec<serde_json::Value>),
}

impl RuleConfigValue {
    /// The severity carried by this value. For tuples it is the first
    /// element, which must be a severity name or number.
    pub fn severity(&self) -> Result<Severity, ConfigError> {
        match self {
            RuleConfigValue::Severity(severity) => Ok(*severity),
            RuleConfigValue::Tuple(values) => {
                let Some(first) = values.first() else {
                    return Err(ConfigError::InvalidSeverity(
                        "empty configuration array".to_string(),
                    ));
                };
                severity_from_value(first)
            }
        }
    }

    /// Rule-specific parameters: everything after the severity.
    pub fn params(&self) -> &[serde_json::Value] {
        match self {
            RuleConfigValue::Severity(_) => &[],
            RuleConfigValue::Tuple(values) => values.get(1..).unwrap_or(&[]),
        }
    }
}

/// Convert a JSON value (string name or integer) into a severity.
pub fn severity_from_value(value: &serde_json::Value) -> Result<Severity, ConfigError> {
    match value {
        serde_json::Value::String(s) => {
            Severity::from_str(s).ok_or_else(|| ConfigError::InvalidSeverity(s.clone()))
        }
        serde_json::Value::Number(n) => n
            .as_u64()
            .and_then(Severity::from_number)
            .ok_or_else(|| ConfigError::InvalidSeverity(n.to_string())),
        other => Err(ConfigError::InvalidSeverity(other.to_string())),
    }
}

/// Linter configuration. Unset fields take their defaults, so a partial
/// configuration object merges with the default configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LinterConfig {
    /// Whether `! aglint` inline configuration comments are honored.
    pub allow_inline_config: bool,
    /// Per-rule configuration, keyed by rule name.
    pub rules: BTreeMap<String, RuleConfigValue>,
}

impl Default for LinterConfig {
    fn default() -> Self {
        Self {
            allow_inline_config: true,
            rules: BTreeMap::new(),
        }
    }
}
