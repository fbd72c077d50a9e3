//! Polling configuration
//!
//! Loads intervals, page sizes, and the payment attempt ceiling from
//! environment variables, with the defaults the web client shipped with.

use serde::Deserialize;
use std::env;
use std::time::Duration;

/// Polling engine configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SyncConfig {
    /// Chat poll interval in milliseconds
    #[serde(default = "default_chat_interval_ms")]
    pub chat_interval_ms: u64,

    /// Payment status poll interval in milliseconds
    #[serde(default = "default_payment_interval_ms")]
    pub payment_interval_ms: u64,

    /// Hard ceiling on payment status attempts (60 * 2s ~ 120s timeout)
    #[serde(default = "default_max_payment_attempts")]
    pub max_payment_attempts: u32,

    /// Items requested on a chat subscription's first fetch
    #[serde(default = "default_initial_page_size")]
    pub initial_page_size: usize,

    /// Items requested per incremental chat fetch
    #[serde(default = "default_incremental_page_size")]
    pub incremental_page_size: usize,
}

// Default value functions
fn default_chat_interval_ms() -> u64 {
    3000
}

fn default_payment_interval_ms() -> u64 {
    2000
}

fn default_max_payment_attempts() -> u32 {
    60
}

fn default_initial_page_size() -> usize {
    50
}

fn default_incremental_page_size() -> usize {
    100
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            chat_interval_ms: default_chat_interval_ms(),
            payment_interval_ms: default_payment_interval_ms(),
            max_payment_attempts: default_max_payment_attempts(),
            initial_page_size: default_initial_page_size(),
            incremental_page_size: default_incremental_page_size(),
        }
    }
}

impl SyncConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if a variable is set but cannot be parsed
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Ok(Self {
            chat_interval_ms: parse_var("CHAT_POLL_INTERVAL_MS", default_chat_interval_ms())?,
            payment_interval_ms: parse_var(
                "PAYMENT_POLL_INTERVAL_MS",
                default_payment_interval_ms(),
            )?,
            max_payment_attempts: parse_var(
                "PAYMENT_MAX_ATTEMPTS",
                default_max_payment_attempts(),
            )?,
            initial_page_size: parse_var("CHAT_INITIAL_PAGE_SIZE", default_initial_page_size())?,
            incremental_page_size: parse_var(
                "CHAT_INCREMENTAL_PAGE_SIZE",
                default_incremental_page_size(),
            )?,
        })
    }

    /// Chat poll interval as a Duration
    #[must_use]
    pub fn chat_interval(&self) -> Duration {
        Duration::from_millis(self.chat_interval_ms)
    }

    /// Payment poll interval as a Duration
    #[must_use]
    pub fn payment_interval(&self) -> Duration {
        Duration::from_millis(self.payment_interval_ms)
    }
}

fn parse_var<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .parse()
            .map_err(|_| ConfigError::InvalidValue(name, raw)),
        Err(_) => Ok(default),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
