//! Hand-off queue for errors that should reach an external reporter

use careercraft_common::RingBuffer;
use careercraft_core::ErrorSink;
use careercraft_domain::StructuredError;
use parking_lot::Mutex;
use tracing::debug;

/// Collects errors flagged `should_report`; everything else is ignored.
///
/// The reporting backend drains the queue on its own schedule. When it falls
/// behind, the oldest unreported errors are dropped.
#[derive(Debug)]
pub struct ReportQueue {
    pending: Mutex<RingBuffer<StructuredError>>,
}

impl ReportQueue {
    pub fn new(capacity: usize) -> Self {
        Self { pending: Mutex::new(RingBuffer::new(capacity)) }
    }

    /// Take every pending error, oldest first.
    pub fn drain(&self) -> Vec<StructuredError> {
        self.pending.lock().drain()
    }

    pub fn len(&self) -> usize {
        self.pending.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.lock().is_empty()
    }
}

impl ErrorSink for ReportQueue {
    fn record(&self, error: &StructuredError) {
        if !error.should_report {
            return;
        }
        if let Some(dropped) = self.pending.lock().push(error.clone()) {
            debug!(error_id = %dropped.id, "report queue full, dropped oldest error");
        }
    }
}

#[cfg(test)]
mod tests {
    use careercraft_core::{classify, ClassificationPolicy, Failure};
    use chrono::Utc;

    use super::*;

    #[test]
    fn only_reportable_errors_are_queued() {
        let policy = ClassificationPolicy::new(true, false);
        let queue = ReportQueue::new(10);

        queue.record(&classify(&Failure::status(500, "", None), &policy, Utc::now()));
        queue.record(&classify(&Failure::status(503, "", None), &policy, Utc::now()));
        queue.record(&classify(&Failure::status(404, "", None), &policy, Utc::now()));

        let drained = queue.drain();
        assert_eq!(drained.len(), 1);
        assert_eq!(drained[0].http_status, Some(500));
        assert!(queue.is_empty());
    }
}
