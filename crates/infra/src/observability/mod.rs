//! Error observation and tracing setup
//!
//! The classifier is pure; everything that happens to a classified error
//! afterwards (retention, console output, reporting) is done by the sinks
//! registered on an [`ErrorObserver`].

pub mod error_log;
pub mod report_queue;
pub mod tracing_sink;

use std::fmt;
use std::sync::Arc;

use careercraft_core::ErrorSink;
use careercraft_domain::StructuredError;
use tracing_subscriber::EnvFilter;

pub use error_log::ErrorLog;
pub use report_queue::ReportQueue;
pub use tracing_sink::TracingErrorSink;

/// Fans a classified error out to every registered sink. Clones share sinks.
#[derive(Clone, Default)]
pub struct ErrorObserver {
    sinks: Arc<Vec<Arc<dyn ErrorSink>>>,
}

impl ErrorObserver {
    pub fn new(sinks: Vec<Arc<dyn ErrorSink>>) -> Self {
        Self { sinks: Arc::new(sinks) }
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl ErrorSink for ErrorObserver {
    fn record(&self, error: &StructuredError) {
        for sink in self.sinks.iter() {
            sink.record(error);
        }
    }
}

impl fmt::Debug for ErrorObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErrorObserver").field("sinks", &self.sinks.len()).finish()
    }
}

/// Output format for [`init_tracing`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

/// Install a global subscriber filtered by `RUST_LOG` (default `info`).
///
/// Returns `false` if a global subscriber was already installed.
pub fn init_tracing(format: LogFormat) -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(true);

    match format {
        LogFormat::Compact => builder.compact().try_init().is_ok(),
        LogFormat::Json => builder.json().with_ansi(false).try_init().is_ok(),
    }
}

#[cfg(test)]
mod tests {
    use careercraft_core::{classify, ClassificationPolicy, Failure};
    use chrono::Utc;

    use super::*;

    #[test]
    fn observer_fans_out_to_every_sink() {
        let log = Arc::new(ErrorLog::new(5));
        let queue = Arc::new(ReportQueue::new(5));
        let sinks: Vec<Arc<dyn ErrorSink>> =
            vec![log.clone(), queue.clone(), Arc::new(TracingErrorSink)];
        let observer = ErrorObserver::new(sinks);

        let error = classify(
            &Failure::status(500, "", None),
            &ClassificationPolicy::new(true, false),
            Utc::now(),
        );
        observer.record(&error);

        assert_eq!(log.len(), 1);
        assert_eq!(queue.len(), 1);
        assert_eq!(observer.len(), 3);
    }

    #[test]
    fn second_init_is_a_no_op() {
        init_tracing(LogFormat::Compact);
        assert!(!init_tracing(LogFormat::Json));
    }
}
