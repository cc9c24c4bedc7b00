//! # CareerCraft Core
//!
//! Pure logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - The failure classifier and its end-user message table
//! - Port interfaces (traits) implemented by the infra crate
//!
//! ## Architecture Principles
//! - Only depends on `careercraft-domain`
//! - No HTTP, filesystem or logging code
//! - All external dependencies via traits

pub mod classification;

// Infrastructure ports
pub mod feature_flags_ports;
pub mod transport_ports;

pub use classification::{
    classify, user_message, ClassificationPolicy, ErrorSink, Failure, TransportKind,
};
pub use feature_flags_ports::{FeatureFlagsPort, FLAG_ERROR_REPORTING};
pub use transport_ports::{AccessTokenProvider, Sleeper};
