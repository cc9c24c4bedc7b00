//! Port interfaces for consuming classified failures

use careercraft_domain::StructuredError;

/// Consumer of classified errors (log, console channel, report queue).
///
/// Sinks are called synchronously from the request path and must not block.
pub trait ErrorSink: Send + Sync {
    fn record(&self, error: &StructuredError);
}

impl<S: ErrorSink + ?Sized> ErrorSink for std::sync::Arc<S> {
    fn record(&self, error: &StructuredError) {
        (**self).record(error);
    }
}
