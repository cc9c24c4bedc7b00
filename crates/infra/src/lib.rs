//! # CareerCraft Infrastructure
//!
//! Infrastructure implementations of the core ports.
//!
//! This crate contains:
//! - The signed, retrying HTTP executor (reqwest)
//! - The API client facade and its per-resource operations
//! - Error observation sinks (bounded log, report queue, tracing)
//! - Configuration loading (environment, `.env`, JSON/TOML files)
//!
//! ## Architecture
//! - Implements traits defined in `careercraft-core`
//! - Depends on `careercraft-common`, `careercraft-domain` and
//!   `careercraft-core`
//! - Contains all "impure" code (network, filesystem, environment)

pub mod api;
pub mod config;
pub mod errors;
pub mod http;
pub mod observability;
pub mod services;

// Re-export commonly used items
pub use api::{ApiClient, ApiClientBuilder, ApiError, SessionToken};
pub use errors::InfraError;
pub use http::{ApiRequest, ApiResponse, Credentials, HttpClient, RequestBody, RequestSigner};
pub use observability::{init_tracing, ErrorLog, ErrorObserver, LogFormat, ReportQueue};
pub use services::ConfigFeatureFlags;
