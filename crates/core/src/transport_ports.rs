//! Ports used by the request executor

use std::time::Duration;

use async_trait::async_trait;

/// Suspends the retry loop between attempts.
///
/// Production code sleeps on the runtime timer; tests inject a recorder so
/// backoff can be asserted without waiting.
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Supplies the bearer token attached to outgoing requests.
///
/// Read once per attempt, so a token replaced mid-sequence is picked up by
/// the next attempt.
pub trait AccessTokenProvider: Send + Sync {
    /// Current token, or `None` when no session is held.
    fn bearer_token(&self) -> Option<String>;
}
