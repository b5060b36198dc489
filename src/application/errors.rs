//! Application layer errors

use std::time::Duration;
use thiserror::Error;

/// Chat transport errors
#[derive(Error, Debug)]
pub enum BotError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Telegram API error in {method}: {description}")]
    Api { method: String, description: String },

    #[error("Parse error: {0}")]
    Parse(String),
}

/// Container engine errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("Failed to connect to container engine: {0}")]
    Connection(String),

    #[error("Engine request {operation} failed: {message}")]
    Request { operation: &'static str, message: String },

    #[error("Engine request {operation} timed out after {after:?}")]
    Timeout { operation: &'static str, after: Duration },
}

impl EngineError {
    pub fn request(operation: &'static str, err: impl std::fmt::Display) -> Self {
        EngineError::Request {
            operation,
            message: err.to_string(),
        }
    }
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{name} environment variable is required")]
    MissingVar { name: &'static str },

    #[error("Invalid {name}: {reason}")]
    InvalidVar { name: &'static str, reason: String },

    #[error("Parse error: {0}")]
    Parse(String),
}
