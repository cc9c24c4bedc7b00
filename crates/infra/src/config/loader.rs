//! Configuration loader
//!
//! Loads client configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. Read a `.env` file if present (via `dotenvy`), then the environment
//! 2. If the credentials are missing, fall back to a config file
//! 3. Probe several paths for config files
//! 4. Support JSON and TOML formats
//!
//! ## Environment Variables
//! - `CAREERCRAFT_API_BASE_URL`: Service base URL
//! - `CAREERCRAFT_API_KEY`: API key (required)
//! - `CAREERCRAFT_API_SECRET`: Signing secret (required)
//! - `CAREERCRAFT_API_TIMEOUT_MS`: Per-attempt timeout in milliseconds
//! - `CAREERCRAFT_RETRY_ATTEMPTS`: Total attempts per call
//! - `CAREERCRAFT_RETRY_DELAY_MS`: Linear backoff unit in milliseconds
//! - `CAREERCRAFT_MAX_FILE_SIZE`: Upload size limit in bytes
//! - `CAREERCRAFT_ERROR_LOG_CAPACITY`: Entries kept in the error log
//! - `CAREERCRAFT_ENVIRONMENT`: `development`, `staging` or `production`
//! - `CAREERCRAFT_ERROR_REPORTING`: Whether errors may be reported (true/false)
//!
//! ## File Locations
//! The loader probes `careercraft.{json,toml}` and `config.{json,toml}` in the
//! working directory, its parent and grandparent, then next to the
//! executable.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use careercraft_domain::constants::{
    DEFAULT_BASE_DELAY_MS, DEFAULT_BASE_URL, DEFAULT_ERROR_LOG_CAPACITY, DEFAULT_MAX_ATTEMPTS,
    DEFAULT_MAX_FILE_SIZE_BYTES, DEFAULT_TIMEOUT_MS,
};
use careercraft_domain::{
    CareerCraftError, ClientConfig, Environment, FeatureFlags, Result, RetryBudget,
};

const CONFIG_FILE_NAMES: [&str; 4] =
    ["careercraft.json", "careercraft.toml", "config.json", "config.toml"];

/// Key/value lookup the loader reads settings from.
pub trait ConfigSource {
    fn get(&self, key: &str) -> Option<String>;
}

/// The process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvSource;

impl ConfigSource for EnvSource {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// Fixed values, for tests and embedding.
#[derive(Debug, Clone, Default)]
pub struct MapSource(HashMap<String, String>);

impl MapSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MapSource {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl ConfigSource for MapSource {
    fn get(&self, key: &str) -> Option<String> {
        self.0.get(key).cloned()
    }
}

/// Load configuration with automatic fallback strategy
///
/// # Errors
/// Returns `CareerCraftError::Config` if configuration cannot be loaded from
/// either source, or a value is malformed.
pub fn load() -> Result<ClientConfig> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = ?e, "Failed to load from environment, trying file");
            load_from_file(None)
        }
    }
}

/// Load configuration from the environment, after reading `.env` if present.
///
/// # Errors
/// Returns `CareerCraftError::Config` if the credentials are missing or a
/// value does not parse.
pub fn load_from_env() -> Result<ClientConfig> {
    if let Ok(path) = dotenvy::dotenv() {
        tracing::debug!(path = %path.display(), "Loaded .env file");
    }
    load_from_source(&EnvSource)
}

/// Load configuration from any [`ConfigSource`].
///
/// # Errors
/// Returns `CareerCraftError::Config` if the credentials are missing or a
/// value does not parse.
pub fn load_from_source(source: &dyn ConfigSource) -> Result<ClientConfig> {
    let api_key = required(source, "CAREERCRAFT_API_KEY")?;
    let api_secret = required(source, "CAREERCRAFT_API_SECRET")?;

    let environment = match source.get("CAREERCRAFT_ENVIRONMENT") {
        Some(value) => Environment::parse(&value)?,
        None => Environment::default(),
    };

    Ok(ClientConfig {
        base_url: source
            .get("CAREERCRAFT_API_BASE_URL")
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        api_key,
        api_secret,
        timeout_ms: parsed(source, "CAREERCRAFT_API_TIMEOUT_MS", DEFAULT_TIMEOUT_MS)?,
        retry: RetryBudget {
            max_attempts: parsed(source, "CAREERCRAFT_RETRY_ATTEMPTS", DEFAULT_MAX_ATTEMPTS)?,
            base_delay_ms: parsed(source, "CAREERCRAFT_RETRY_DELAY_MS", DEFAULT_BASE_DELAY_MS)?,
        },
        max_file_size_bytes: parsed(
            source,
            "CAREERCRAFT_MAX_FILE_SIZE",
            DEFAULT_MAX_FILE_SIZE_BYTES,
        )?,
        error_log_capacity: parsed(
            source,
            "CAREERCRAFT_ERROR_LOG_CAPACITY",
            DEFAULT_ERROR_LOG_CAPACITY,
        )?,
        flags: FeatureFlags {
            environment,
            error_reporting: flag(source, "CAREERCRAFT_ERROR_REPORTING", true),
        },
    })
}

/// Load configuration from a file
///
/// If `path` is `None`, probes the standard locations. Format is detected by
/// file extension.
///
/// # Errors
/// Returns `CareerCraftError::Config` if the file is missing, unreadable or
/// malformed.
pub fn load_from_file(path: Option<PathBuf>) -> Result<ClientConfig> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(CareerCraftError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            CareerCraftError::Config(
                "No config file found in any of the standard locations".to_string(),
            )
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| CareerCraftError::Config(format!("Failed to read config file: {}", e)))?;

    parse_config(&contents, &config_path)
}

fn parse_config(contents: &str, path: &Path) -> Result<ClientConfig> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| CareerCraftError::Config(format!("Invalid TOML format: {}", e))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| CareerCraftError::Config(format!("Invalid JSON format: {}", e))),
        _ => Err(CareerCraftError::Config(format!("Unsupported config format: {}", extension))),
    }
}

/// First existing config file under the standard locations.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut roots = Vec::new();
    if let Ok(cwd) = std::env::current_dir() {
        roots.push(cwd);
    }
    if let Some(exe_dir) =
        std::env::current_exe().ok().and_then(|exe| exe.parent().map(Path::to_path_buf))
    {
        roots.push(exe_dir);
    }

    roots.iter().find_map(|root| probe_config_paths_in(root))
}

/// First existing config file in `root`, its parent or its grandparent.
pub fn probe_config_paths_in(root: &Path) -> Option<PathBuf> {
    root.ancestors()
        .take(3)
        .flat_map(|dir| CONFIG_FILE_NAMES.iter().map(move |name| dir.join(name)))
        .find(|path| path.is_file())
}

fn required(source: &dyn ConfigSource, key: &str) -> Result<String> {
    source.get(key).filter(|v| !v.trim().is_empty()).ok_or_else(|| {
        CareerCraftError::Config(format!("Missing required environment variable: {}", key))
    })
}

fn parsed<T>(source: &dyn ConfigSource, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match source.get(key) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|e| CareerCraftError::Config(format!("Invalid value for {}: {}", key, e))),
        None => Ok(default),
    }
}

/// Accepts `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive).
fn flag(source: &dyn ConfigSource, key: &str, default: bool) -> bool {
    source
        .get(key)
        .map(|s| matches!(s.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}
