//! Error conversions at the infrastructure boundary

pub mod conversions;

pub use conversions::{transport_failure, InfraError};
