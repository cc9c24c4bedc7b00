//! Classified failure types
//!
//! [`StructuredError`] is the normalized representation of every failure
//! produced by the transport layer. It is built once by the classifier and
//! never mutated afterwards.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Failure taxonomy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// 401 - the session is missing or expired
    Authentication,
    /// 403 - authenticated but not permitted
    Authorization,
    /// 400 / 422, or rejected locally before sending
    Validation,
    /// No HTTP status: connection failure or timeout
    Network,
    /// 500 / 502 / 503 / 504
    Server,
    /// 404 / 409
    Client,
    /// Anything else
    Unknown,
}

impl ErrorCategory {
    /// Stable label for logs and metrics.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Authentication => "authentication",
            Self::Authorization => "authorization",
            Self::Validation => "validation",
            Self::Network => "network",
            Self::Server => "server",
            Self::Client => "client",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Severity, ordered from least to most serious.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => write!(f, "LOW"),
            Self::Medium => write!(f, "MEDIUM"),
            Self::High => write!(f, "HIGH"),
            Self::Critical => write!(f, "CRITICAL"),
        }
    }
}

/// Classified, immutable description of a failed request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredError {
    /// Time-ordered (v7) identifier.
    pub id: Uuid,
    /// Developer-facing message (server message or status line).
    pub message: String,
    /// Fixed human-readable text safe to show end users.
    pub user_message: String,
    /// Response status; `None` for transport failures and local rejections.
    pub http_status: Option<u16>,
    /// Machine error code supplied by the server, if any.
    pub code: Option<String>,
    pub category: ErrorCategory,
    pub severity: ErrorSeverity,
    /// Whether the executor may try the same request again.
    pub retryable: bool,
    /// Whether the error should reach the external reporter.
    pub should_report: bool,
    /// When the failure was classified.
    pub timestamp: DateTime<Utc>,
    /// Text rendering of the raw failure (transport error chain or
    /// response body).
    pub original_cause: Option<String>,
}

impl StructuredError {
    /// `true` for any 4xx status.
    pub fn is_client_error(&self) -> bool {
        matches!(self.http_status, Some(400..=499))
    }
}

impl fmt::Display for StructuredError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.http_status {
            Some(status) => write!(f, "[{}] HTTP {}: {}", self.category, status, self.message),
            None => write!(f, "[{}] {}", self.category, self.message),
        }
    }
}

impl std::error::Error for StructuredError {}

/// Error payload returned by the remote service for non-2xx responses.
///
/// The service answers either `{"message", "error_code", "details"}` or
/// `{"detail"}`, so every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub detail: Option<serde_json::Value>,
    #[serde(default)]
    pub error: Option<serde_json::Value>,
    #[serde(default)]
    pub error_code: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
}

impl ServerErrorBody {
    /// Parse a response body; `None` when it is not a JSON object.
    pub fn parse(body: &str) -> Option<Self> {
        let value: serde_json::Value = serde_json::from_str(body).ok()?;
        if !value.is_object() {
            return None;
        }
        serde_json::from_value(value).ok()
    }

    /// Human-readable message: `message`, then `detail`, then `error`.
    pub fn message(&self) -> Option<String> {
        if let Some(message) = self.message.as_ref().filter(|m| !m.trim().is_empty()) {
            return Some(message.clone());
        }
        [&self.detail, &self.error].into_iter().flatten().find_map(|value| match value {
            serde_json::Value::String(text) if !text.trim().is_empty() => Some(text.clone()),
            serde_json::Value::Null | serde_json::Value::Bool(_) => None,
            serde_json::Value::String(_) => None,
            other => Some(other.to_string()),
        })
    }

    pub fn code(&self) -> Option<String> {
        self.error_code.clone().or_else(|| self.code.clone())
    }
}
