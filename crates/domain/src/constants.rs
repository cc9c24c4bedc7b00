//! Application constants
//!
//! Centralized location for the wire contract and client defaults.

// Transport defaults
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
pub const DEFAULT_BASE_DELAY_MS: u64 = 1_000;

// Uploads
pub const DEFAULT_MAX_FILE_SIZE_BYTES: u64 = 10 * 1024 * 1024;
pub const ALLOWED_UPLOAD_EXTENSIONS: [&str; 3] = ["pdf", "docx", "txt"];
pub const MIN_JOB_DESCRIPTION_CHARS: usize = 50;

// Error observation
pub const DEFAULT_ERROR_LOG_CAPACITY: usize = 100;

// Signed request headers
pub const HEADER_API_KEY: &str = "X-API-Key";
pub const HEADER_TIMESTAMP: &str = "X-Timestamp";
pub const HEADER_SIGNATURE: &str = "X-Signature";

/// ISO-8601, UTC, second precision, no fractional seconds.
pub const SIGNATURE_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";
