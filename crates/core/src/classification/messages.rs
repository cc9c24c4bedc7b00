//! End-user message table
//!
//! Messages are fixed strings keyed by category; they never echo server
//! text, which may contain internal details.

use careercraft_domain::ErrorCategory;

const GENERIC: &str = "An unexpected error occurred. Please try again.";

/// Human-readable text for a classified failure.
///
/// Categorized failures get their category's message. Uncategorized ones
/// fall back to a status-specific message, then to a generic one.
pub fn user_message(category: ErrorCategory, status: Option<u16>) -> &'static str {
    match category {
        ErrorCategory::Authentication => {
            "Your session may have expired. Please sign in again."
        }
        ErrorCategory::Authorization => "You don't have permission to perform this action.",
        ErrorCategory::Validation => {
            "Some of the information provided is invalid. Please review it and try again."
        }
        ErrorCategory::Network => {
            "Unable to reach the server. Please check your internet connection and try again."
        }
        ErrorCategory::Server => {
            "The server encountered a problem. Please try again in a few moments."
        }
        ErrorCategory::Client => match status {
            Some(409) => "This request conflicts with the current state of the resource.",
            _ => "The requested item could not be found.",
        },
        ErrorCategory::Unknown => status.map_or(GENERIC, status_message),
    }
}

fn status_message(status: u16) -> &'static str {
    match status {
        408 => "The request took too long. Please try again.",
        413 => "The file is too large to upload.",
        415 => "This file type is not supported.",
        429 => "Too many requests. Please wait a moment and try again.",
        _ => GENERIC,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_messages_ignore_status() {
        assert_eq!(
            user_message(ErrorCategory::Authentication, Some(401)),
            user_message(ErrorCategory::Authentication, None)
        );
        assert!(user_message(ErrorCategory::Authentication, None).contains("sign in again"));
    }

    #[test]
    fn unknown_uses_status_then_generic() {
        assert!(user_message(ErrorCategory::Unknown, Some(429)).contains("Too many requests"));
        assert_eq!(user_message(ErrorCategory::Unknown, Some(418)), GENERIC);
        assert_eq!(user_message(ErrorCategory::Unknown, None), GENERIC);
    }
}
