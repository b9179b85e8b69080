//! Configuration module for Koala.
//!
//! Loads configuration from environment variables.

use std::env;
use std::time::Duration;

use thiserror::Error;

const DEFAULT_PORT: u16 = 80;
const DEFAULT_PREFIX: &str = "!";
const DEFAULT_DATABASE: &str = "koala";
const DEFAULT_OP_TIMEOUT_SECS: u64 = 10;

/// Startup configuration errors. Every variant is fatal to the process.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("PORT must be a valid port number, got {0:?}")]
    InvalidPort(String),

    #[error("OP_TIMEOUT_SECS must be a positive integer, got {0:?}")]
    InvalidTimeout(String),
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    // Bot
    pub bot_token: String,

    /// Prefix that marks a chat message as a command.
    pub command_prefix: String,

    // HTTP
    pub port: u16,

    // MongoDB
    pub mongodb_uri: String,

    /// Database the bot's own commands read and write.
    pub mongodb_database: String,

    /// Timeout applied to every store operation issued by the bot.
    pub op_timeout: Duration,
}

impl Config {
    /// Load configuration from the process environment.
    ///
    /// `.env` is loaded once by the bootstrap before this is called.
    ///
    /// # Errors
    /// Returns [`ConfigError`] if a required variable is missing or a value
    /// cannot be parsed. The caller is expected to abort startup.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Blank values count as unset.
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let mongodb_uri = get("MONGODB_URI").ok_or(ConfigError::Missing("MONGODB_URI"))?;

        let bot_token = get("BOT_TOKEN")
            .or_else(|| get("token"))
            .ok_or(ConfigError::Missing("BOT_TOKEN"))?;

        let port = match get("PORT") {
            Some(raw) => raw.parse::<u16>().map_err(|_| ConfigError::InvalidPort(raw))?,
            None => DEFAULT_PORT,
        };

        let op_timeout = match get("OP_TIMEOUT_SECS") {
            Some(raw) => match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => return Err(ConfigError::InvalidTimeout(raw)),
            },
            None => Duration::from_secs(DEFAULT_OP_TIMEOUT_SECS),
        };

        Ok(Self {
            bot_token,
            command_prefix: get("COMMAND_PREFIX").unwrap_or_else(|| DEFAULT_PREFIX.to_string()),
            port,
            mongodb_uri,
            mongodb_database: get("MONGODB_DATABASE")
                .unwrap_or_else(|| DEFAULT_DATABASE.to_string()),
            op_timeout,
        })
    }
}
