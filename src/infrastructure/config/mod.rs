//! Configuration management

use serde::{Deserialize, Serialize};
use std::path::Path;
use crate::application::errors::ConfigError;

/// Environment variable holding the bot token
pub const TOKEN_VAR: &str = "TOKEN";

/// Environment variable holding the operator's user id
pub const USER_ID_VAR: &str = "USER_ID";

/// Optional settings, read from a YAML file
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Config {
    pub telegram: TelegramConfig,
    pub docker: DockerConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct TelegramConfig {
    pub api_base: String,
    pub poll_timeout_secs: u64,
    /// Bound on every other Bot API call, sendMessage included
    pub request_timeout_secs: u64,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.telegram.org".to_string(),
            poll_timeout_secs: 60,
            request_timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct DockerConfig {
    /// Engine endpoint; the environment decides when unset
    pub host: Option<String>,
}

impl Config {
    /// Load settings from `path`, falling back to defaults when the file is absent
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Parse(format!("Failed to read config: {}", e)))?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(content)
            .map_err(|e| ConfigError::Parse(format!("Failed to parse config: {}", e)))
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        serde_yaml::to_string(self)
            .map_err(|e| ConfigError::Parse(format!("Failed to serialize config: {}", e)))
    }
}

/// Secrets and identity, always taken from the environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub token: String,
    pub allowed_user: i64,
}

impl Credentials {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read both variables through `lookup`; empty values count as missing
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let token = lookup(TOKEN_VAR)
            .filter(|v| !v.is_empty())
            .ok_or(ConfigError::MissingVar { name: TOKEN_VAR })?;

        let user_id = lookup(USER_ID_VAR)
            .filter(|v| !v.is_empty())
            .ok_or(ConfigError::MissingVar { name: USER_ID_VAR })?;

        let allowed_user = user_id
            .trim()
            .parse::<i64>()
            .map_err(|e| ConfigError::InvalidVar {
                name: USER_ID_VAR,
                reason: e.to_string(),
            })?;

        Ok(Self { token, allowed_user })
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = token.into();
        self
    }
}
