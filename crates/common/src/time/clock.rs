//! Wall-clock abstraction
//!
//! Signing timestamps and error timestamps both come from a [`Clock`] so
//! tests can pin them.
//!
//! # Examples
//!
//! ```
//! use chrono::{Duration, TimeZone, Utc};
//!
//! use careercraft_common::time::{Clock, MockClock};
//!
//! let clock = MockClock::at(Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap());
//! let start = clock.now_utc();
//! clock.advance(Duration::seconds(5));
//! assert_eq!(clock.now_utc() - start, Duration::seconds(5));
//! ```

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;

/// Source of the current UTC time.
pub trait Clock: Send + Sync {
    fn now_utc(&self) -> DateTime<Utc>;
}

/// Real system clock. Use this in production code.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_utc(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Manually driven clock for deterministic tests. Clones share state.
#[derive(Debug, Clone)]
pub struct MockClock {
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl MockClock {
    /// Starts at the current real time.
    pub fn new() -> Self {
        Self::at(Utc::now())
    }

    pub fn at(instant: DateTime<Utc>) -> Self {
        Self { now: Arc::new(Mutex::new(instant)) }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock();
        *now += by;
    }

    pub fn set(&self, instant: DateTime<Utc>) {
        *self.now.lock() = instant;
    }
}

impl Default for MockClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MockClock {
    fn now_utc(&self) -> DateTime<Utc> {
        *self.now.lock()
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn mock_clock_is_frozen_until_advanced() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let clock = MockClock::at(start);

        assert_eq!(clock.now_utc(), start);
        assert_eq!(clock.now_utc(), start);

        clock.advance(Duration::seconds(90));
        assert_eq!(clock.now_utc(), start + Duration::seconds(90));
    }

    #[test]
    fn clones_share_time() {
        let clock = MockClock::new();
        let other = clock.clone();
        let target = Utc.with_ymd_and_hms(2030, 6, 1, 8, 30, 0).unwrap();

        other.set(target);
        assert_eq!(clock.now_utc(), target);
    }

    #[test]
    fn system_clock_moves_forward() {
        let clock = SystemClock;
        let a = clock.now_utc();
        let b = clock.now_utc();
        assert!(b >= a);
    }
}
