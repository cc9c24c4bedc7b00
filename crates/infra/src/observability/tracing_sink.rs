//! Console channel for classified errors

use careercraft_core::ErrorSink;
use careercraft_domain::{ErrorSeverity, StructuredError};
use tracing::{error, info, warn};

/// Writes each classified error to `tracing` at a level derived from its
/// severity: low → info, medium → warn, high and critical → error.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingErrorSink;

impl ErrorSink for TracingErrorSink {
    fn record(&self, e: &StructuredError) {
        let status = e.http_status.unwrap_or_default();
        let code = e.code.as_deref().unwrap_or_default();
        match e.severity {
            ErrorSeverity::Low => info!(
                error_id = %e.id,
                category = %e.category,
                severity = %e.severity,
                status,
                code,
                retryable = e.retryable,
                "{}",
                e.message
            ),
            ErrorSeverity::Medium => warn!(
                error_id = %e.id,
                category = %e.category,
                severity = %e.severity,
                status,
                code,
                retryable = e.retryable,
                "{}",
                e.message
            ),
            ErrorSeverity::High | ErrorSeverity::Critical => error!(
                error_id = %e.id,
                category = %e.category,
                severity = %e.severity,
                status,
                code,
                retryable = e.retryable,
                "{}",
                e.message
            ),
        }
    }
}
