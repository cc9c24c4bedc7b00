//! Client configuration
//!
//! Plain data loaded by the infra config loader (environment or file) and
//! validated once, when the API client is constructed.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_BASE_DELAY_MS, DEFAULT_BASE_URL, DEFAULT_ERROR_LOG_CAPACITY, DEFAULT_MAX_ATTEMPTS,
    DEFAULT_MAX_FILE_SIZE_BYTES, DEFAULT_TIMEOUT_MS,
};
use crate::errors::{CareerCraftError, Result};

/// Deployment environment reported by the configuration source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    /// Parse the environment name used by env vars and config files.
    pub fn parse(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "staging" => Ok(Self::Staging),
            "production" | "prod" => Ok(Self::Production),
            other => Err(CareerCraftError::Config(format!("Unknown environment: {other}"))),
        }
    }

    pub fn is_production(self) -> bool {
        matches!(self, Self::Production)
    }
}

/// Externally supplied switches consumed by the error classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureFlags {
    #[serde(default)]
    pub environment: Environment,
    /// Master switch for error reporting; `false` disables `should_report`
    /// entirely.
    #[serde(default = "default_true")]
    pub error_reporting: bool,
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self { environment: Environment::default(), error_reporting: true }
    }
}

/// Retry budget shared by every call of one client instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryBudget {
    /// Total attempts, including the first one.
    pub max_attempts: u32,
    /// Linear backoff unit; attempt `n` failing waits `base_delay * n`.
    pub base_delay_ms: u64,
}

impl RetryBudget {
    pub fn base_delay(&self) -> Duration {
        Duration::from_millis(self.base_delay_ms)
    }

    /// Delay inserted after the `failed_attempt`-th (1-based) attempt fails.
    pub fn backoff_delay(&self, failed_attempt: u32) -> Duration {
        self.base_delay().saturating_mul(failed_attempt)
    }
}

impl Default for RetryBudget {
    fn default() -> Self {
        Self { max_attempts: DEFAULT_MAX_ATTEMPTS, base_delay_ms: DEFAULT_BASE_DELAY_MS }
    }
}

/// Configuration for the signed API client
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct ClientConfig {
    /// Base URL for the API (e.g., "https://api.careercraft.ai")
    #[serde(default = "default_base_url")]
    pub base_url: String,
    pub api_key: String,
    pub api_secret: String,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default)]
    pub retry: RetryBudget,
    #[serde(default = "default_max_file_size")]
    pub max_file_size_bytes: u64,
    #[serde(default = "default_log_capacity")]
    pub error_log_capacity: usize,
    #[serde(default)]
    pub flags: FeatureFlags,
}

impl ClientConfig {
    /// Config with defaults for everything except the credentials.
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            api_secret: api_secret.into(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            retry: RetryBudget::default(),
            max_file_size_bytes: DEFAULT_MAX_FILE_SIZE_BYTES,
            error_log_capacity: DEFAULT_ERROR_LOG_CAPACITY,
            flags: FeatureFlags::default(),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Validate the configuration
    ///
    /// # Errors
    /// Returns `CareerCraftError::Config` describing the first invalid field.
    pub fn validate(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            return Err(CareerCraftError::Config("API key is required".into()));
        }
        if self.api_secret.is_empty() {
            return Err(CareerCraftError::Config("API secret is required".into()));
        }

        let parsed = url::Url::parse(&self.base_url).map_err(|e| {
            CareerCraftError::Config(format!("Invalid base URL '{}': {}", self.base_url, e))
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(CareerCraftError::Config(format!(
                "Base URL must use http or https, got '{}'",
                parsed.scheme()
            )));
        }

        if self.timeout_ms == 0 {
            return Err(CareerCraftError::Config("Timeout must be positive".into()));
        }
        if self.retry.max_attempts == 0 {
            return Err(CareerCraftError::Config("Retry attempts must be at least 1".into()));
        }
        if self.max_file_size_bytes == 0 {
            return Err(CareerCraftError::Config("Max file size must be positive".into()));
        }
        if self.error_log_capacity == 0 {
            return Err(CareerCraftError::Config("Error log capacity must be positive".into()));
        }

        Ok(())
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key)
            .field("api_secret", &"[REDACTED]")
            .field("timeout_ms", &self.timeout_ms)
            .field("retry", &self.retry)
            .field("max_file_size_bytes", &self.max_file_size_bytes)
            .field("error_log_capacity", &self.error_log_capacity)
            .field("flags", &self.flags)
            .finish()
    }
}

fn default_true() -> bool {
    true
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

fn default_max_file_size() -> u64 {
    DEFAULT_MAX_FILE_SIZE_BYTES
}

fn default_log_capacity() -> usize {
    DEFAULT_ERROR_LOG_CAPACITY
}
