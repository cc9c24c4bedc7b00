//! API-specific error types
//!
//! Every facade and executor call fails with an [`ApiError`]: either the
//! classified failure of the last attempt, or a cancellation.

use careercraft_domain::{ErrorCategory, StructuredError};
use thiserror::Error;

const CANCELLED_MESSAGE: &str = "The request was cancelled.";

/// API operation errors
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    #[error("{0}")]
    Classified(StructuredError),

    #[error("Operation cancelled")]
    Cancelled,
}

impl ApiError {
    /// The classified failure, unless the call was cancelled.
    pub fn structured(&self) -> Option<&StructuredError> {
        match self {
            Self::Classified(error) => Some(error),
            Self::Cancelled => None,
        }
    }

    pub fn category(&self) -> Option<ErrorCategory> {
        self.structured().map(|error| error.category)
    }

    pub fn http_status(&self) -> Option<u16> {
        self.structured().and_then(|error| error.http_status)
    }

    /// Text safe to show to an end user.
    pub fn user_message(&self) -> &str {
        match self {
            Self::Classified(error) => &error.user_message,
            Self::Cancelled => CANCELLED_MESSAGE,
        }
    }

    /// Whether a later, caller-initiated retry may succeed.
    pub fn is_retryable(&self) -> bool {
        self.structured().is_some_and(|error| error.retryable)
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

impl From<StructuredError> for ApiError {
    fn from(value: StructuredError) -> Self {
        Self::Classified(value)
    }
}

#[cfg(test)]
mod tests {
    use careercraft_core::{classify, ClassificationPolicy, Failure};
    use chrono::Utc;

    use super::*;

    #[test]
    fn classified_errors_expose_their_fields() {
        let error: ApiError =
            classify(&Failure::status(401, "Unauthorized", None), &ClassificationPolicy::default(), Utc::now())
                .into();

        assert_eq!(error.category(), Some(ErrorCategory::Authentication));
        assert_eq!(error.http_status(), Some(401));
        assert!(error.user_message().contains("sign in again"));
        assert!(!error.is_retryable());
        assert!(error.to_string().contains("HTTP 401"));
    }

    #[test]
    fn cancellation_has_no_classification() {
        let error = ApiError::Cancelled;
        assert!(error.is_cancelled());
        assert_eq!(error.category(), None);
        assert_eq!(error.user_message(), CANCELLED_MESSAGE);
    }
}
