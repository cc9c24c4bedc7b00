use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use careercraft_common::time::MockClock;
use careercraft_core::Sleeper;
use careercraft_domain::ClientConfig;
use careercraft_infra::http::{Credentials, RequestSigner};
use careercraft_infra::ApiClient;
use chrono::{TimeZone, Utc};
use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;
use wiremock::MockServer;

pub const API_KEY: &str = "test-key";
pub const API_SECRET: &str = "test-secret";

/// Records backoff delays instead of sleeping.
#[derive(Default)]
pub struct RecordingSleeper {
    delays: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn delays(&self) -> Vec<Duration> {
        self.delays.lock().clone()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.delays.lock().push(duration);
    }
}

/// Fires `token` on the first backoff and then never wakes up.
pub struct CancellingSleeper {
    pub token: CancellationToken,
}

#[async_trait]
impl Sleeper for CancellingSleeper {
    async fn sleep(&self, _duration: Duration) {
        self.token.cancel();
        std::future::pending::<()>().await;
    }
}

pub fn fixed_clock() -> MockClock {
    MockClock::at(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
}

pub fn config_for(server: &MockServer) -> ClientConfig {
    ClientConfig::new(server.uri(), API_KEY, API_SECRET)
}

/// Client against `server` with a recording sleeper and a fixed clock.
pub fn client_for(server: &MockServer, config: ClientConfig) -> (ApiClient, Arc<RecordingSleeper>) {
    let sleeper = Arc::new(RecordingSleeper::default());
    let client = ApiClient::builder(config)
        .sleeper(sleeper.clone())
        .clock(Arc::new(fixed_clock()))
        .build()
        .expect("client should build");
    (client, sleeper)
}

/// Independent signer holding the same credentials, for server-side checks.
pub fn verifier() -> RequestSigner {
    let credentials = Credentials::new(API_KEY, API_SECRET).expect("credentials");
    RequestSigner::new(credentials, Arc::new(fixed_clock()))
}

pub fn header<'a>(request: &'a wiremock::Request, name: &str) -> Option<&'a str> {
    request.headers.get(name).and_then(|value| value.to_str().ok())
}
