//! CareerCraft API client facade
//!
//! One method per remote operation, grouped by resource:
//!
//! - `auth`: login, refresh, logout, status and session lookups
//! - `files`: upload, extracted text, info, cleanup, supported formats
//! - `analysis`: submit, poll, results, cancel, history
//! - `health`: basic, detailed, readiness and liveness probes
//!
//! All of them delegate to the signed [`HttpClient`](crate::http::HttpClient).

pub mod analysis;
pub mod auth;
pub mod client;
pub mod errors;
pub mod files;
pub mod health;

pub use analysis::validate_analysis;
pub use auth::SessionToken;
pub use client::{ApiClient, ApiClientBuilder};
pub use errors::ApiError;
pub use files::validate_upload;
