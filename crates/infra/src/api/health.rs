//! Health check operations

use careercraft_domain::{DetailedHealth, HealthStatus};
use tracing::instrument;

use super::client::ApiClient;
use super::errors::ApiError;
use crate::http::ApiRequest;

impl ApiClient {
    /// Basic liveness of the service.
    #[instrument(skip(self))]
    pub async fn health(&self) -> Result<HealthStatus, ApiError> {
        self.call(ApiRequest::get("/health")).await
    }

    /// Health including configuration, dependency and performance sections.
    #[instrument(skip(self))]
    pub async fn health_detailed(&self) -> Result<DetailedHealth, ApiError> {
        self.call(ApiRequest::get("/health/detailed")).await
    }

    #[instrument(skip(self))]
    pub async fn readiness(&self) -> Result<HealthStatus, ApiError> {
        self.call(ApiRequest::get("/health/ready")).await
    }

    #[instrument(skip(self))]
    pub async fn liveness(&self) -> Result<HealthStatus, ApiError> {
        self.call(ApiRequest::get("/health/live")).await
    }
}
