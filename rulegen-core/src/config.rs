use std::env;

use crate::errors::{ConfigError, RulegenError};

/// Prefix used by [`RulegenConfig::from_env`].
pub const DEFAULT_PREFIX: &str = "RULEGEN_";

/// Rule id a fresh session starts with when nothing else is configured.
pub const DEFAULT_RULE_ID: i64 = 100100;

/// Rule level a fresh session starts with when nothing else is configured.
pub const DEFAULT_RULE_LEVEL: i64 = 5;

/// Process configuration shared by the rulegen binaries.
#[derive(Debug, Clone, PartialEq)]
pub struct RulegenConfig {
    pub log_level: Option<String>,
    pub default_rule_id: i64,
    pub default_level: i64,
    pub escape_output: bool,
}

impl Default for RulegenConfig {
    fn default() -> Self {
        Self {
            log_level: None,
            default_rule_id: DEFAULT_RULE_ID,
            default_level: DEFAULT_RULE_LEVEL,
            escape_output: false,
        }
    }
}

impl RulegenConfig {
    /// Loads configuration from the process environment (`RULEGEN_*`).
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_env_with_prefix(DEFAULT_PREFIX)
    }

    /// Loads configuration from env vars prefixed with the provided value (e.g. `RULEGEN_`).
    pub fn from_env_with_prefix(prefix: &str) -> Result<Self, ConfigError> {
        Self::from_lookup(prefix, |key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(prefix: &str, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let key = |suffix: &str| format!("{}{}", prefix, suffix);

        let log_level = lookup(&key("LOG")).filter(|raw| !raw.trim().is_empty());

        let default_rule_id =
            parse_integer(&key("DEFAULT_ID"), lookup(&key("DEFAULT_ID")))?.unwrap_or(DEFAULT_RULE_ID);
        let default_level = parse_integer(&key("DEFAULT_LEVEL"), lookup(&key("DEFAULT_LEVEL")))?
            .unwrap_or(DEFAULT_RULE_LEVEL);

        let escape_output = match lookup(&key("ESCAPE")) {
            Some(raw) => parse_flag(&key("ESCAPE"), &raw)?,
            None => false,
        };

        Ok(Self {
            log_level,
            default_rule_id,
            default_level,
            escape_output,
        })
    }

    /// Log directive to hand to the tracing subscriber.
    pub fn log_level(&self) -> Option<&str> {
        self.log_level.as_deref()
    }
}

fn parse_integer(key: &str, raw: Option<String>) -> Result<Option<i64>, ConfigError> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse::<i64>()
        .map(Some)
        .map_err(|err| ConfigError::InvalidEnvVar {
            key: key.to_string(),
            value: raw.clone(),
            reason: err.to_string(),
        })
}

fn parse_flag(key: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(ConfigError::InvalidEnvVar {
            key: key.to_string(),
            value: raw.to_string(),
            reason: "expected a boolean flag".into(),
        }),
    }
}

/// Helper that loads config and converts to the canonical rulegen error type.
pub fn load_config() -> Result<RulegenConfig, RulegenError> {
    Ok(RulegenConfig::from_env()?)
}
