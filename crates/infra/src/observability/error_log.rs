//! Bounded in-memory log of classified errors

use careercraft_common::RingBuffer;
use careercraft_core::ErrorSink;
use careercraft_domain::StructuredError;
use parking_lot::Mutex;

/// Most-recent-N error log. Past capacity the oldest entry is dropped.
#[derive(Debug)]
pub struct ErrorLog {
    entries: Mutex<RingBuffer<StructuredError>>,
}

impl ErrorLog {
    pub fn new(capacity: usize) -> Self {
        Self { entries: Mutex::new(RingBuffer::new(capacity)) }
    }

    pub fn push(&self, error: StructuredError) {
        self.entries.lock().push(error);
    }

    /// All entries, oldest first.
    pub fn snapshot(&self) -> Vec<StructuredError> {
        self.entries.lock().to_vec()
    }

    /// Up to `n` entries, newest first.
    pub fn recent(&self, n: usize) -> Vec<StructuredError> {
        self.entries.lock().latest(n).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.entries.lock().capacity()
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}

impl ErrorSink for ErrorLog {
    fn record(&self, error: &StructuredError) {
        self.push(error.clone());
    }
}
