//! Signed HTTP transport

pub mod body;
pub mod client;
pub mod signer;

pub use body::{MultipartField, RequestBody};
pub use client::{ApiRequest, ApiResponse, HttpClient, HttpClientBuilder, TokioSleeper};
pub use signer::{canonical_message, Credentials, RequestSigner, SignedEnvelope};
