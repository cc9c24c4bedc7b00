//! Failure classification
//!
//! [`classify`] is a pure function: it turns a raw [`Failure`] into a
//! [`StructuredError`] and performs no I/O. Logging, reporting and retention
//! are the job of [`ErrorSink`](super::ErrorSink) implementations.

use chrono::{DateTime, Utc};
use careercraft_domain::{ErrorCategory, ErrorSeverity, FeatureFlags, ServerErrorBody, StructuredError};
use uuid::Uuid;

use super::messages::user_message;

/// Statuses that are never retried, whatever their category.
const TERMINAL_STATUSES: [u16; 5] = [400, 401, 403, 404, 422];

/// What kind of transport-level failure occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportKind {
    /// The per-attempt deadline fired before a response arrived.
    Timeout,
    /// The connection could not be established.
    Connect,
    Other,
}

/// A raw failure, before classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Failure {
    /// The server answered with a non-2xx status.
    Status { status: u16, status_text: String, body: Option<String> },
    /// No response was received.
    Transport { kind: TransportKind, message: String },
    /// The request was rejected locally before any I/O.
    Invalid { message: String },
    /// A 2xx response whose body could not be decoded.
    Decode { status: u16, message: String },
}

impl Failure {
    pub fn status(status: u16, status_text: impl Into<String>, body: Option<String>) -> Self {
        Self::Status { status, status_text: status_text.into(), body }
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::Transport { kind: TransportKind::Timeout, message: message.into() }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid { message: message.into() }
    }

    fn http_status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } | Self::Decode { status, .. } => Some(*status),
            Self::Transport { .. } | Self::Invalid { .. } => None,
        }
    }
}

/// Deployment facts the reporting decision depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClassificationPolicy {
    pub reporting_enabled: bool,
    pub production: bool,
}

impl ClassificationPolicy {
    pub fn new(reporting_enabled: bool, production: bool) -> Self {
        Self { reporting_enabled, production }
    }
}

impl From<&FeatureFlags> for ClassificationPolicy {
    fn from(flags: &FeatureFlags) -> Self {
        Self { reporting_enabled: flags.error_reporting, production: flags.environment.is_production() }
    }
}

/// Category for an HTTP status, or for the absence of one.
pub fn category_for(status: Option<u16>, transport_failure: bool) -> ErrorCategory {
    match status {
        Some(401) => ErrorCategory::Authentication,
        Some(403) => ErrorCategory::Authorization,
        Some(400 | 422) => ErrorCategory::Validation,
        Some(404 | 409) => ErrorCategory::Client,
        Some(500 | 502 | 503 | 504) => ErrorCategory::Server,
        None if transport_failure => ErrorCategory::Network,
        _ => ErrorCategory::Unknown,
    }
}

pub fn severity_for(category: ErrorCategory, status: Option<u16>) -> ErrorSeverity {
    match category {
        ErrorCategory::Authentication | ErrorCategory::Authorization | ErrorCategory::Network => {
            ErrorSeverity::Medium
        }
        ErrorCategory::Validation => ErrorSeverity::Low,
        ErrorCategory::Server if status == Some(500) => ErrorSeverity::High,
        ErrorCategory::Server => ErrorSeverity::Medium,
        ErrorCategory::Client | ErrorCategory::Unknown => ErrorSeverity::Low,
    }
}

pub fn is_retryable(category: ErrorCategory, status: Option<u16>) -> bool {
    let transient = matches!(category, ErrorCategory::Network | ErrorCategory::Server);
    transient && !status.is_some_and(|s| TERMINAL_STATUSES.contains(&s))
}

pub fn should_report(
    category: ErrorCategory,
    severity: ErrorSeverity,
    policy: &ClassificationPolicy,
) -> bool {
    if !policy.reporting_enabled {
        return false;
    }
    severity == ErrorSeverity::High || (category == ErrorCategory::Server && policy.production)
}

/// Classify a failure observed at `now`.
pub fn classify(
    failure: &Failure,
    policy: &ClassificationPolicy,
    now: DateTime<Utc>,
) -> StructuredError {
    let status = failure.http_status();

    let (category, message, code, original_cause) = match failure {
        Failure::Status { status, status_text, body } => {
            let parsed = body.as_deref().and_then(ServerErrorBody::parse);
            let message = parsed
                .as_ref()
                .and_then(ServerErrorBody::message)
                .unwrap_or_else(|| status_line(*status, status_text));
            let code = parsed.as_ref().and_then(ServerErrorBody::code);
            (category_for(Some(*status), false), message, code, body.clone())
        }
        Failure::Transport { kind, message } => {
            let text = match kind {
                TransportKind::Timeout => format!("request timed out: {message}"),
                TransportKind::Connect => format!("connection failed: {message}"),
                TransportKind::Other => format!("transport error: {message}"),
            };
            (ErrorCategory::Network, text, None, Some(message.clone()))
        }
        Failure::Invalid { message } => (ErrorCategory::Validation, message.clone(), None, None),
        Failure::Decode { message, .. } => (
            ErrorCategory::Unknown,
            format!("failed to decode response body: {message}"),
            None,
            Some(message.clone()),
        ),
    };

    let severity = severity_for(category, status);

    StructuredError {
        id: Uuid::now_v7(),
        message,
        user_message: user_message(category, status).to_string(),
        http_status: status,
        code,
        category,
        severity,
        retryable: is_retryable(category, status),
        should_report: should_report(category, severity, policy),
        timestamp: now,
        original_cause,
    }
}

fn status_line(status: u16, status_text: &str) -> String {
    let text = status_text.trim();
    if text.is_empty() {
        format!("HTTP {status}")
    } else {
        format!("HTTP {status} {text}")
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap()
    }

    fn classify_status(status: u16) -> StructuredError {
        classify(&Failure::status(status, "", None), &ClassificationPolicy::default(), now())
    }

    #[test]
    fn classification_table() {
        use ErrorCategory::*;
        use ErrorSeverity::*;

        let cases: [(u16, ErrorCategory, ErrorSeverity, bool); 11] = [
            (400, Validation, Low, false),
            (401, Authentication, Medium, false),
            (403, Authorization, Medium, false),
            (404, Client, Low, false),
            (409, Client, Low, false),
            (422, Validation, Low, false),
            (429, Unknown, Low, false),
            (500, Server, High, true),
            (502, Server, Medium, true),
            (503, Server, Medium, true),
            (504, Server, Medium, true),
        ];

        for (status, category, severity, retryable) in cases {
            let error = classify_status(status);
            assert_eq!(error.category, category, "category for {status}");
            assert_eq!(error.severity, severity, "severity for {status}");
            assert_eq!(error.retryable, retryable, "retryable for {status}");
            assert_eq!(error.http_status, Some(status));
        }
    }

    #[test]
    fn transport_failures_are_network_and_retryable() {
        for failure in [
            Failure::timeout("30s elapsed"),
            Failure::Transport { kind: TransportKind::Connect, message: "refused".into() },
            Failure::Transport { kind: TransportKind::Other, message: "reset".into() },
        ] {
            let error = classify(&failure, &ClassificationPolicy::default(), now());
            assert_eq!(error.category, ErrorCategory::Network);
            assert_eq!(error.severity, ErrorSeverity::Medium);
            assert!(error.retryable);
            assert_eq!(error.http_status, None);
        }
    }

    #[test]
    fn local_rejection_is_low_severity_validation() {
        let error = classify(
            &Failure::invalid("file exceeds 10485760 bytes"),
            &ClassificationPolicy::default(),
            now(),
        );
        assert_eq!(error.category, ErrorCategory::Validation);
        assert_eq!(error.severity, ErrorSeverity::Low);
        assert!(!error.retryable);
        assert_eq!(error.message, "file exceeds 10485760 bytes");
    }

    #[test]
    fn decode_failure_is_terminal_unknown() {
        let failure = Failure::Decode { status: 200, message: "expected value".into() };
        let error = classify(&failure, &ClassificationPolicy::default(), now());
        assert_eq!(error.category, ErrorCategory::Unknown);
        assert!(!error.retryable);
        assert!(!error.is_client_error());
    }

    #[test]
    fn server_body_supplies_message_and_code() {
        let body = r#"{"error": true, "error_code": "ANALYSIS_FAILED", "message": "Pipeline crashed"}"#;
        let error = classify(
            &Failure::status(500, "Internal Server Error", Some(body.into())),
            &ClassificationPolicy::default(),
            now(),
        );
        assert_eq!(error.message, "Pipeline crashed");
        assert_eq!(error.code.as_deref(), Some("ANALYSIS_FAILED"));
        assert_eq!(error.original_cause.as_deref(), Some(body));
    }

    #[test]
    fn invalid_json_falls_back_to_status_line() {
        let error = classify(
            &Failure::status(502, "Bad Gateway", Some("<html>nginx</html>".into())),
            &ClassificationPolicy::default(),
            now(),
        );
        assert_eq!(error.message, "HTTP 502 Bad Gateway");
        assert_eq!(error.code, None);
    }

    #[test]
    fn reporting_policy() {
        let production = ClassificationPolicy::new(true, true);
        let development = ClassificationPolicy::new(true, false);
        let disabled = ClassificationPolicy::new(false, true);
        let failure_500 = Failure::status(500, "", None);
        let failure_503 = Failure::status(503, "", None);

        assert!(classify(&failure_500, &development, now()).should_report);
        assert!(!classify(&failure_503, &development, now()).should_report);
        assert!(classify(&failure_503, &production, now()).should_report);
        assert!(!classify(&failure_500, &disabled, now()).should_report);
        assert!(!classify(&Failure::status(401, "", None), &production, now()).should_report);
    }

    #[test]
    fn policy_follows_feature_flags() {
        let flags = FeatureFlags {
            environment: careercraft_domain::Environment::Production,
            error_reporting: true,
        };
        assert_eq!(ClassificationPolicy::from(&flags), ClassificationPolicy::new(true, true));
    }

    #[test]
    fn timestamp_comes_from_caller() {
        assert_eq!(classify_status(503).timestamp, now());
    }
}
