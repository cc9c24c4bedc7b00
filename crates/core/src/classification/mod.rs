//! Failure classification

pub mod classifier;
pub mod messages;
pub mod ports;

pub use classifier::{
    category_for, classify, is_retryable, severity_for, should_report, ClassificationPolicy,
    Failure, TransportKind,
};
pub use messages::user_message;
pub use ports::ErrorSink;
