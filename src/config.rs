//! Machine configuration.
//!
//! Configuration is resolved in the following order (later overrides earlier):
//! 1. Default values
//! 2. JSON document (via [`FsmConfig::from_json`])
//! 3. Environment variables (via [`FsmConfig::apply_env_overrides`])

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable overriding [`FsmConfig::history_limit`].
pub const HISTORY_LIMIT_ENV: &str = "STATECRAFT_HISTORY_LIMIT";
/// Environment variable overriding [`FsmConfig::publish_unchanged`].
pub const PUBLISH_UNCHANGED_ENV: &str = "STATECRAFT_PUBLISH_UNCHANGED";

const DEFAULT_HISTORY_LIMIT: usize = 100;

/// Errors produced while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid value '{value}' for {var}")]
    InvalidValue { var: &'static str, value: String },
}

/// Runtime options of a machine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FsmConfig {
    /// Maximum number of executed transitions kept in history. `None` keeps all.
    pub history_limit: Option<usize>,
    /// Publish recomputed candidate sets even when they equal the previous set.
    pub publish_unchanged: bool,
}

impl Default for FsmConfig {
    fn default() -> Self {
        Self {
            history_limit: Some(DEFAULT_HISTORY_LIMIT),
            publish_unchanged: true,
        }
    }
}

impl FsmConfig {
    /// Parse a JSON document; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Defaults with environment overrides applied.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Apply overrides from the process environment.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides(|var| std::env::var(var).ok())
    }

    fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        if let Some(value) = lookup(HISTORY_LIMIT_ENV) {
            self.history_limit = match value.trim().to_ascii_lowercase().as_str() {
                "none" | "unlimited" => None,
                other => Some(other.parse().map_err(|_| ConfigError::InvalidValue {
                    var: HISTORY_LIMIT_ENV,
                    value: value.clone(),
                })?),
            };
        }

        if let Some(value) = lookup(PUBLISH_UNCHANGED_ENV) {
            self.publish_unchanged = match value.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" => true,
                "0" | "false" | "no" => false,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        var: PUBLISH_UNCHANGED_ENV,
                        value,
                    })
                }
            };
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&'static str, &str)]) -> impl Fn(&'static str) -> Option<String> {
        let map: HashMap<&'static str, String> =
            pairs.iter().map(|(k, v)| (*k, v.to_string())).collect();
        move |var| map.get(var).cloned()
    }

    #[test]
    fn defaults() {
        let config = FsmConfig::default();
        assert_eq!(config.history_limit, Some(100));
        assert!(config.publish_unchanged);
    }

    #[test]
    fn json_fills_missing_fields() {
        let config = FsmConfig::from_json(r#"{"publish_unchanged": false}"#).unwrap();
        assert_eq!(config.history_limit, Some(100));
        assert!(!config.publish_unchanged);

        let config = FsmConfig::from_json(r#"{"history_limit": null}"#).unwrap();
        assert_eq!(config.history_limit, None);
    }

    #[test]
    fn json_errors_are_reported() {
        let result = FsmConfig::from_json("{not json");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn env_overrides_apply() {
        let mut config = FsmConfig::default();
        config
            .apply_overrides(env(&[
                (HISTORY_LIMIT_ENV, "12"),
                (PUBLISH_UNCHANGED_ENV, "false"),
            ]))
            .unwrap();

        assert_eq!(config.history_limit, Some(12));
        assert!(!config.publish_unchanged);
    }

    #[test]
    fn env_can_lift_history_limit() {
        let mut config = FsmConfig::default();
        config
            .apply_overrides(env(&[(HISTORY_LIMIT_ENV, "None")]))
            .unwrap();
        assert_eq!(config.history_limit, None);
    }

    #[test]
    fn invalid_env_values_are_rejected() {
        let mut config = FsmConfig::default();
        let result = config.apply_overrides(env(&[(HISTORY_LIMIT_ENV, "lots")]));
        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue { var: HISTORY_LIMIT_ENV, .. })
        ));

        let result = config.apply_overrides(env(&[(PUBLISH_UNCHANGED_ENV, "maybe")]));
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }
}
