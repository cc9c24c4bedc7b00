//! Domain types and models

pub mod analysis;
pub mod auth;
pub mod failure;
pub mod files;
pub mod health;

pub use analysis::{
    AnalysisHistory, AnalysisProgress, AnalysisRequest, AnalysisResults, AnalysisStarted,
    AnalysisSummary, ProcessingStatus, ProgressStep, Tone,
};
pub use auth::{AuthResponse, AuthStatus, LoginRequest, RefreshRequest, SessionInfo, StatusMessage};
pub use failure::{ErrorCategory, ErrorSeverity, ServerErrorBody, StructuredError};
pub use files::{ExtractedText, FileInfo, FileUpload, FileUploadResponse, SupportedFormats};
pub use health::{DetailedHealth, HealthStatus};
