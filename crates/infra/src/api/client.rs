//! API client facade
//!
//! [`ApiClient`] owns the signed executor, the bearer-token session and the
//! error observation pipeline. Per-resource operations live in the sibling
//! `auth`, `files`, `analysis` and `health` modules as further `impl` blocks.
//!
//! The client is constructed once by the application and passed around; it
//! is cheap to clone and clones share the transport, session and logs.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use careercraft_common::time::{Clock, SystemClock};
use careercraft_core::{
    classify, ClassificationPolicy, ErrorSink, FeatureFlagsPort, Failure, Sleeper,
};
use careercraft_domain::{CareerCraftError, ClientConfig};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument};

use super::auth::SessionToken;
use super::errors::ApiError;
use crate::http::{ApiRequest, ApiResponse, Credentials, HttpClient, TokioSleeper};
use crate::observability::{ErrorLog, ErrorObserver, ReportQueue, TracingErrorSink};
use crate::services::ConfigFeatureFlags;

/// Signed, retrying client for the CareerCraft API
#[derive(Clone)]
pub struct ApiClient {
    http: Arc<HttpClient>,
    session: Arc<SessionToken>,
    observer: ErrorObserver,
    error_log: Arc<ErrorLog>,
    report_queue: Arc<ReportQueue>,
    policy: ClassificationPolicy,
    clock: Arc<dyn Clock>,
    max_file_size: u64,
    cancel: CancellationToken,
}

impl ApiClient {
    /// Create a client with the production sleeper, clock and flag source.
    ///
    /// # Errors
    ///
    /// Returns `CareerCraftError::Config` if the configuration is invalid
    /// (missing credentials, bad URL, zero timeout or attempts).
    pub fn new(config: ClientConfig) -> Result<Self, CareerCraftError> {
        Self::builder(config).build()
    }

    /// Create a builder for fluent configuration
    pub fn builder(config: ClientConfig) -> ApiClientBuilder {
        ApiClientBuilder::new(config)
    }

    /// A handle whose calls all observe `token`.
    ///
    /// The handle shares transport, session and logs with `self`. Once the
    /// token fires, in-flight and future calls through it return
    /// [`ApiError::Cancelled`].
    pub fn with_cancellation(&self, token: CancellationToken) -> Self {
        Self { cancel: token, ..self.clone() }
    }

    pub fn session(&self) -> &SessionToken {
        &self.session
    }

    /// Bounded log of every classified failure.
    pub fn error_log(&self) -> &ErrorLog {
        &self.error_log
    }

    /// Failures waiting for the external reporter.
    pub fn report_queue(&self) -> &ReportQueue {
        &self.report_queue
    }

    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    pub fn max_file_size(&self) -> u64 {
        self.max_file_size
    }

    /// Execute an arbitrary request and keep the response metadata.
    ///
    /// # Errors
    ///
    /// Returns the classified failure of the last attempt, or
    /// `ApiError::Cancelled`.
    #[instrument(skip(self, request), fields(method = %request.method, path = %request.path))]
    pub async fn send<T: DeserializeOwned>(
        &self,
        request: ApiRequest,
    ) -> Result<ApiResponse<T>, ApiError> {
        self.http.execute(&request, &self.cancel).await
    }

    pub(crate) async fn call<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, ApiError> {
        self.send(request).await.map(|response| response.data)
    }

    pub(crate) fn with_json<B: Serialize + ?Sized>(
        &self,
        request: ApiRequest,
        body: &B,
    ) -> Result<ApiRequest, ApiError> {
        request.json(body).map_err(|e| self.reject(e.to_string()))
    }

    /// Classify and record a request refused before any I/O.
    pub(crate) fn reject(&self, message: impl Into<String>) -> ApiError {
        let error = classify(&Failure::invalid(message), &self.policy, self.clock.now_utc());
        self.observer.record(&error);
        ApiError::Classified(error)
    }
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("http", &self.http)
            .field("session", &self.session)
            .field("observer", &self.observer)
            .finish_non_exhaustive()
    }
}

/// Percent-encode a caller-supplied path segment.
pub(crate) fn segment(value: &str) -> Cow<'_, str> {
    urlencoding::encode(value)
}

/// Builder for [`ApiClient`]
pub struct ApiClientBuilder {
    config: ClientConfig,
    sleeper: Arc<dyn Sleeper>,
    clock: Arc<dyn Clock>,
    flags: Option<Arc<dyn FeatureFlagsPort>>,
    sinks: Vec<Arc<dyn ErrorSink>>,
    user_agent: String,
}

impl ApiClientBuilder {
    fn new(config: ClientConfig) -> Self {
        Self {
            config,
            sleeper: Arc::new(TokioSleeper),
            clock: Arc::new(SystemClock),
            flags: None,
            sinks: Vec::new(),
            user_agent: format!("careercraft-client/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Replace the backoff sleeper (tests record delays instead of waiting).
    pub fn sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Flag source for the reporting decision. Defaults to the config's
    /// `flags` section.
    pub fn feature_flags(mut self, flags: Arc<dyn FeatureFlagsPort>) -> Self {
        self.flags = Some(flags);
        self
    }

    /// Register an additional error sink.
    pub fn sink(mut self, sink: Arc<dyn ErrorSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = agent.into();
        self
    }

    /// # Errors
    ///
    /// Returns `CareerCraftError::Config` if the configuration is invalid.
    pub fn build(self) -> Result<ApiClient, CareerCraftError> {
        let config = self.config;
        config.validate()?;

        let credentials = Credentials::new(config.api_key.clone(), config.api_secret.clone())?;
        let flags: Arc<dyn FeatureFlagsPort> = match self.flags {
            Some(flags) => flags,
            None => Arc::new(ConfigFeatureFlags::new(config.flags)),
        };
        let policy = ClassificationPolicy::from_port(flags.as_ref());

        let error_log = Arc::new(ErrorLog::new(config.error_log_capacity));
        let report_queue = Arc::new(ReportQueue::new(config.error_log_capacity));
        let mut sinks: Vec<Arc<dyn ErrorSink>> =
            vec![error_log.clone(), report_queue.clone(), Arc::new(TracingErrorSink)];
        sinks.extend(self.sinks);
        let observer = ErrorObserver::new(sinks);

        let session = Arc::new(SessionToken::default());
        let http = HttpClient::builder()
            .base_url(config.base_url.clone())
            .credentials(credentials)
            .timeout(config.timeout())
            .retry(config.retry)
            .sleeper(self.sleeper)
            .clock(self.clock.clone())
            .policy(policy)
            .observer(observer.clone())
            .token_provider(session.clone())
            .user_agent(self.user_agent)
            .build()?;

        info!(
            base_url = %config.base_url,
            timeout_ms = config.timeout_ms,
            max_attempts = config.retry.max_attempts,
            environment = ?config.flags.environment,
            "API client initialised"
        );

        Ok(ApiClient {
            http: Arc::new(http),
            session,
            observer,
            error_log,
            report_queue,
            policy,
            clock: self.clock,
            max_file_size: config.max_file_size_bytes,
            cancel: CancellationToken::new(),
        })
    }
}
