use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use careercraft_common::time::{Clock, SystemClock};
use careercraft_core::{
    classify, AccessTokenProvider, ClassificationPolicy, ErrorSink, Failure, Sleeper,
};
use careercraft_domain::constants::{
    DEFAULT_TIMEOUT_MS, HEADER_API_KEY, HEADER_SIGNATURE, HEADER_TIMESTAMP,
};
use careercraft_domain::{CareerCraftError, RetryBudget, StructuredError};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client as ReqwestClient, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::body::RequestBody;
use super::signer::{Credentials, RequestSigner};
use crate::api::ApiError;
use crate::errors::{transport_failure, InfraError};
use crate::observability::ErrorObserver;

/// One logical operation: retried attempts all send the same request.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    /// HTTP method of every attempt.
    pub method: Method,
    /// Path relative to the base URL, starting with `/`.
    pub path: String,
    /// Query parameters, appended in order.
    pub query: Vec<(String, String)>,
    /// Body, re-encoded for each attempt.
    pub body: RequestBody,
    /// Extra headers. Signing and authorization headers always win, and a
    /// `Content-Type` here is dropped.
    pub headers: HeaderMap,
    /// Per-call override of the client's attempt timeout.
    pub timeout: Option<Duration>,
}

impl ApiRequest {
    /// Bodiless request for `path`.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: RequestBody::Empty,
            headers: HeaderMap::new(),
            timeout: None,
        }
    }

    /// `GET path`.
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// `POST path`, bodiless until [`body`](Self::body) or [`json`](Self::json).
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    /// `DELETE path`.
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Replace the body.
    pub fn body(mut self, body: RequestBody) -> Self {
        self.body = body;
        self
    }

    /// Serialize `value` as the JSON body.
    ///
    /// # Errors
    /// Returns `CareerCraftError::Serialization` if `value` cannot be encoded.
    pub fn json<T: Serialize + ?Sized>(self, value: &T) -> Result<Self, CareerCraftError> {
        Ok(self.body(RequestBody::json(value)?))
    }

    /// Append one query parameter.
    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    /// Add an extra header. `Content-Type` is ignored when sending.
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Override the client's per-attempt timeout for this call.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// A successful (2xx) exchange.
#[derive(Debug, Clone)]
pub struct ApiResponse<T> {
    /// Decoded body; an empty body decodes as JSON `null`.
    pub data: T,
    pub status: StatusCode,
    /// Response headers as received.
    pub headers: HeaderMap,
}

/// Sleeps on the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        if !duration.is_zero() {
            tokio::time::sleep(duration).await;
        }
    }
}

/// Signed HTTP executor with per-attempt timeout and linear-backoff retries.
///
/// Every attempt is signed afresh. A failed attempt is classified, handed to
/// the observer, and retried unless it was a 4xx, an undecodable success, or
/// the budget is spent.
#[derive(Clone)]
pub struct HttpClient {
    client: ReqwestClient,
    base_url: String,
    signer: Arc<RequestSigner>,
    timeout: Duration,
    retry: RetryBudget,
    sleeper: Arc<dyn Sleeper>,
    clock: Arc<dyn Clock>,
    policy: ClassificationPolicy,
    observer: ErrorObserver,
    tokens: Option<Arc<dyn AccessTokenProvider>>,
}

impl HttpClient {
    /// Start building a new HTTP client.
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    /// Signer shared by every attempt.
    pub fn signer(&self) -> &RequestSigner {
        &self.signer
    }

    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Run `request` to completion, retrying transient failures.
    ///
    /// # Errors
    /// `ApiError::Cancelled` once `cancel` fires, otherwise the last
    /// classified failure.
    pub async fn execute<T: DeserializeOwned>(
        &self,
        request: &ApiRequest,
        cancel: &CancellationToken,
    ) -> Result<ApiResponse<T>, ApiError> {
        let attempts = self.retry.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            if cancel.is_cancelled() {
                debug!(attempt, path = %request.path, "request cancelled before attempt");
                return Err(ApiError::Cancelled);
            }

            let outcome = tokio::select! {
                biased;
                () = cancel.cancelled() => return Err(ApiError::Cancelled),
                outcome = self.attempt::<T>(request, attempt) => outcome,
            };

            let failure = match outcome {
                Ok(response) => return Ok(response),
                Err(failure) => failure,
            };

            let error = classify(&failure, &self.policy, self.clock.now_utc());
            self.observer.record(&error);

            if !should_retry(&failure, &error) || attempt >= attempts {
                return Err(ApiError::Classified(error));
            }

            let delay = self.retry.backoff_delay(attempt);
            debug!(
                attempt,
                max_attempts = attempts,
                delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                category = %error.category,
                path = %request.path,
                "retrying request"
            );

            tokio::select! {
                biased;
                () = cancel.cancelled() => return Err(ApiError::Cancelled),
                () = self.sleeper.sleep(delay) => {}
            }

            attempt += 1;
        }
    }

    async fn attempt<T: DeserializeOwned>(
        &self,
        request: &ApiRequest,
        attempt: u32,
    ) -> Result<ApiResponse<T>, Failure> {
        let builder = self.prepare(request)?;
        let timeout = request.timeout.unwrap_or(self.timeout);

        debug!(attempt, method = %request.method, path = %request.path, "sending signed request");

        match tokio::time::timeout(timeout, exchange::<T>(builder)).await {
            Ok(result) => result,
            Err(_) => Err(Failure::timeout(format!(
                "no response within {} ms",
                timeout.as_millis()
            ))),
        }
    }

    /// Build the reqwest request for one attempt, with a fresh signature.
    fn prepare(&self, request: &ApiRequest) -> Result<RequestBuilder, Failure> {
        let envelope = self
            .signer
            .envelope(request.method.clone(), &request.path, request.body.signing_segment())
            .map_err(|e| Failure::invalid(e.to_string()))?;

        let mut headers = request.headers.clone();
        // The body alone decides the content type.
        headers.remove(CONTENT_TYPE);
        headers.insert(HEADER_API_KEY, header_value(self.signer.key())?);
        headers.insert(HEADER_TIMESTAMP, header_value(&envelope.timestamp)?);
        headers.insert(HEADER_SIGNATURE, header_value(&envelope.signature)?);
        if let Some(token) = self.tokens.as_ref().and_then(|tokens| tokens.bearer_token()) {
            headers.insert(AUTHORIZATION, header_value(&format!("Bearer {token}"))?);
        }

        let mut builder =
            self.client.request(request.method.clone(), self.url_for(&request.path)).headers(headers);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }

        request.body.apply(builder).map_err(|e| Failure::invalid(format!("invalid request body: {e}")))
    }

    fn url_for(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }
}

impl fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpClient")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("retry", &self.retry)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

async fn exchange<T: DeserializeOwned>(builder: RequestBuilder) -> Result<ApiResponse<T>, Failure> {
    let response = builder.send().await.map_err(|e| transport_failure(&e))?;
    let status = response.status();
    let headers = response.headers().clone();
    let text = response.text().await.map_err(|e| transport_failure(&e))?;

    debug!(%status, "received HTTP response");

    if !status.is_success() {
        let body = Some(text).filter(|body| !body.trim().is_empty());
        return Err(Failure::status(status.as_u16(), status.canonical_reason().unwrap_or(""), body));
    }

    let data = decode_body(&text)
        .map_err(|e| Failure::Decode { status: status.as_u16(), message: e.to_string() })?;

    Ok(ApiResponse { data, status, headers })
}

/// Empty bodies (204/205, or an empty 200) decode as JSON `null`.
fn decode_body<T: DeserializeOwned>(text: &str) -> serde_json::Result<T> {
    if text.trim().is_empty() {
        serde_json::from_value(serde_json::Value::Null)
    } else {
        serde_json::from_str(text)
    }
}

fn should_retry(failure: &Failure, error: &StructuredError) -> bool {
    !error.is_client_error() && !matches!(failure, Failure::Decode { .. } | Failure::Invalid { .. })
}

fn header_value(value: &str) -> Result<HeaderValue, Failure> {
    HeaderValue::from_str(value).map_err(|e| Failure::invalid(format!("invalid header value: {e}")))
}

/// Builder for [`HttpClient`].
pub struct HttpClientBuilder {
    base_url: String,
    credentials: Option<Credentials>,
    timeout: Duration,
    retry: RetryBudget,
    sleeper: Arc<dyn Sleeper>,
    clock: Arc<dyn Clock>,
    policy: ClassificationPolicy,
    observer: ErrorObserver,
    tokens: Option<Arc<dyn AccessTokenProvider>>,
    user_agent: Option<String>,
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self {
            base_url: careercraft_domain::constants::DEFAULT_BASE_URL.to_string(),
            credentials: None,
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            retry: RetryBudget::default(),
            sleeper: Arc::new(TokioSleeper),
            clock: Arc::new(SystemClock),
            policy: ClassificationPolicy::new(true, false),
            observer: ErrorObserver::default(),
            tokens: None,
            user_agent: None,
        }
    }
}

impl HttpClientBuilder {
    /// Service root; a trailing slash is stripped.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Key and secret used to sign every attempt. Required.
    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Per-attempt deadline.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Attempt budget and backoff unit.
    pub fn retry(mut self, retry: RetryBudget) -> Self {
        self.retry = retry;
        self
    }

    /// Backoff sleeper; defaults to [`TokioSleeper`].
    pub fn sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    /// Source of signature timestamps and error times.
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Reporting policy passed to the classifier.
    pub fn policy(mut self, policy: ClassificationPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Receives every classified attempt failure.
    pub fn observer(mut self, observer: ErrorObserver) -> Self {
        self.observer = observer;
        self
    }

    /// Bearer token source, read on every attempt.
    pub fn token_provider(mut self, tokens: Arc<dyn AccessTokenProvider>) -> Self {
        self.tokens = Some(tokens);
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Validate the settings and build the client.
    ///
    /// # Errors
    /// Returns `CareerCraftError::Config` for missing credentials, an
    /// unparsable base URL, a zero timeout or a zero attempt budget.
    pub fn build(self) -> Result<HttpClient, CareerCraftError> {
        let credentials = self
            .credentials
            .ok_or_else(|| CareerCraftError::Config("API credentials are required".into()))?;

        url::Url::parse(&self.base_url).map_err(|e| {
            CareerCraftError::Config(format!("Invalid base URL '{}': {}", self.base_url, e))
        })?;
        if self.timeout.is_zero() {
            return Err(CareerCraftError::Config("Timeout must be positive".into()));
        }
        if self.retry.max_attempts == 0 {
            return Err(CareerCraftError::Config("Retry attempts must be at least 1".into()));
        }

        let mut builder = ReqwestClient::builder().no_proxy();
        if let Some(agent) = self.user_agent {
            builder = builder.user_agent(agent);
        }
        let client = builder.build().map_err(|err| {
            let infra: InfraError = err.into();
            CareerCraftError::from(infra)
        })?;

        Ok(HttpClient {
            client,
            base_url: self.base_url.trim_end_matches('/').to_string(),
            signer: Arc::new(RequestSigner::new(credentials, self.clock.clone())),
            timeout: self.timeout,
            retry: self.retry,
            sleeper: self.sleeper,
            clock: self.clock,
            policy: self.policy,
            observer: self.observer,
            tokens: self.tokens,
        })
    }
}
