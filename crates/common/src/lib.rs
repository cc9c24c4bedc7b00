//! # CareerCraft Common
//!
//! Foundation utilities shared by the core and infra crates. Nothing in
//! here performs I/O.
//!
//! - [`collections::RingBuffer`]: fixed-capacity, overwrite-oldest buffer
//! - [`security::SecureString`]: zeroised secret that never prints
//! - [`time::Clock`]: wall-clock abstraction with a controllable mock

pub mod collections;
pub mod security;
pub mod time;

pub use collections::RingBuffer;
pub use security::SecureString;
pub use time::{Clock, MockClock, SystemClock};
