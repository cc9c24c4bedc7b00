//! Secret handling

pub mod secure_string;

pub use secure_string::{constant_time_eq, SecureString};
