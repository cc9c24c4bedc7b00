//! # CareerCraft Domain
//!
//! Domain types shared by every layer of the API client.
//!
//! This crate contains:
//! - Wire models for the auth, file, analysis and health endpoints
//! - The classified failure type ([`StructuredError`]) and its taxonomy
//! - Client configuration and its validation rules
//! - Domain error types and Result definitions
//!
//! ## Architecture
//! - No dependencies on other CareerCraft crates
//! - Only external dependencies allowed
//! - Pure data structures, no I/O

pub mod config;
pub mod constants;
pub mod errors;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
