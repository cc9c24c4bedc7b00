//! Request signing
//!
//! Every request carries an HMAC-SHA256 over
//! `key + "\n" + timestamp + "\n" + body`, base64-encoded. The body segment
//! is the exact JSON text sent on the wire, or the empty string for
//! multipart, binary and bodiless requests.

use std::fmt;
use std::sync::Arc;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use careercraft_common::security::{constant_time_eq, SecureString};
use careercraft_common::time::Clock;
use careercraft_domain::constants::SIGNATURE_TIMESTAMP_FORMAT;
use careercraft_domain::{CareerCraftError, Result};
use hmac::{Hmac, Mac};
use reqwest::Method;
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// API key and signing secret. The secret is zeroized on drop.
#[derive(Clone)]
pub struct Credentials {
    key: String,
    secret: SecureString,
}

impl Credentials {
    /// # Errors
    /// Returns `CareerCraftError::Config` when either value is empty.
    pub fn new(key: impl Into<String>, secret: impl Into<String>) -> Result<Self> {
        let key = key.into();
        let secret = SecureString::new(secret);
        if key.trim().is_empty() {
            return Err(CareerCraftError::Config("API key is required".into()));
        }
        if secret.is_empty() {
            return Err(CareerCraftError::Config("API secret is required".into()));
        }
        Ok(Self { key, secret })
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials").field("key", &self.key).field("secret", &self.secret).finish()
    }
}

/// Everything that went into one attempt's signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedEnvelope {
    pub method: Method,
    pub path: String,
    /// Body segment that was signed (empty for multipart/binary).
    pub body: String,
    pub timestamp: String,
    pub signature: String,
}

/// The exact text the MAC is computed over.
pub fn canonical_message(key: &str, timestamp: &str, body: &str) -> String {
    format!("{key}\n{timestamp}\n{body}")
}

/// Signs requests with the client's credentials and clock.
pub struct RequestSigner {
    credentials: Credentials,
    clock: Arc<dyn Clock>,
}

impl RequestSigner {
    pub fn new(credentials: Credentials, clock: Arc<dyn Clock>) -> Self {
        Self { credentials, clock }
    }

    pub fn key(&self) -> &str {
        self.credentials.key()
    }

    /// Current time in the signature timestamp format (UTC, whole seconds).
    pub fn timestamp(&self) -> String {
        self.clock.now_utc().format(SIGNATURE_TIMESTAMP_FORMAT).to_string()
    }

    /// Base64 HMAC-SHA256 for `timestamp` and `body`.
    ///
    /// # Errors
    /// Only fails if the MAC rejects the key, which HMAC never does for a
    /// non-empty secret.
    pub fn sign(&self, timestamp: &str, body: &str) -> Result<String> {
        let mac = self.mac(timestamp, body)?;
        Ok(BASE64.encode(mac.finalize().into_bytes()))
    }

    /// Sign one attempt with a fresh timestamp.
    pub fn envelope(&self, method: Method, path: &str, body: &str) -> Result<SignedEnvelope> {
        let timestamp = self.timestamp();
        let signature = self.sign(&timestamp, body)?;
        Ok(SignedEnvelope {
            method,
            path: path.to_string(),
            body: body.to_string(),
            timestamp,
            signature,
        })
    }

    /// Recompute the signature and compare in constant time.
    pub fn verify(&self, timestamp: &str, body: &str, signature: &str) -> bool {
        let Ok(expected) = self.sign(timestamp, body) else {
            return false;
        };
        constant_time_eq(expected.as_bytes(), signature.as_bytes())
    }

    fn mac(&self, timestamp: &str, body: &str) -> Result<HmacSha256> {
        let mut mac = HmacSha256::new_from_slice(self.credentials.secret.expose_bytes())
            .map_err(|e| CareerCraftError::Internal(format!("failed to key HMAC: {e}")))?;
        mac.update(canonical_message(self.key(), timestamp, body).as_bytes());
        Ok(mac)
    }
}

impl fmt::Debug for RequestSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestSigner").field("credentials", &self.credentials).finish()
    }
}

#[cfg(test)]
mod tests {
    use careercraft_common::time::MockClock;
    use chrono::{Duration, TimeZone, Utc};

    use super::*;

    const TIMESTAMP: &str = "2024-01-01T00:00:00Z";

    fn signer() -> (RequestSigner, MockClock) {
        let clock = MockClock::at(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        let credentials = Credentials::new("test-key", "test-secret").unwrap();
        (RequestSigner::new(credentials, Arc::new(clock.clone())), clock)
    }

    #[test]
    fn known_vectors() {
        let (signer, _) = signer();
        assert_eq!(
            signer.sign(TIMESTAMP, r#"{"a":1}"#).unwrap(),
            "HZhVere4X7pE5iZG3sOgSUoc/cd1AeHK018zuCV8jGQ="
        );
        assert_eq!(signer.sign(TIMESTAMP, "").unwrap(), "bKN4l9li+a3SkSatx3ooUW0WaSfK7wLdm69aW+jDDsM=");
    }

    #[test]
    fn deterministic_and_sensitive_to_every_input() {
        let (signer, _) = signer();
        let base = signer.sign(TIMESTAMP, "body").unwrap();
        assert_eq!(signer.sign(TIMESTAMP, "body").unwrap(), base);

        assert_ne!(signer.sign("2024-01-01T00:00:01Z", "body").unwrap(), base);
        assert_ne!(signer.sign(TIMESTAMP, "body2").unwrap(), base);

        let clock: Arc<dyn Clock> = Arc::new(MockClock::new());
        let other_key = RequestSigner::new(Credentials::new("other-key", "test-secret").unwrap(), clock.clone());
        let other_secret = RequestSigner::new(Credentials::new("test-key", "other-secret").unwrap(), clock);
        assert_ne!(other_key.sign(TIMESTAMP, "body").unwrap(), base);
        assert_ne!(other_secret.sign(TIMESTAMP, "body").unwrap(), base);
    }

    #[test]
    fn canonical_message_joins_with_newlines() {
        assert_eq!(canonical_message("k", "t", ""), "k\nt\n");
        assert_eq!(canonical_message("k", "t", r#"{"a":1}"#), "k\nt\n{\"a\":1}");
    }

    #[test]
    fn envelope_uses_fresh_second_precision_timestamp() {
        let (signer, clock) = signer();
        let first = signer.envelope(Method::GET, "/health", "").unwrap();
        assert_eq!(first.timestamp, TIMESTAMP);

        clock.advance(Duration::milliseconds(1_500));
        let second = signer.envelope(Method::GET, "/health", "").unwrap();
        assert_eq!(second.timestamp, "2024-01-01T00:00:01Z");
        assert_ne!(first.signature, second.signature);
    }

    #[test]
    fn verify_accepts_only_matching_signatures() {
        let (signer, _) = signer();
        let envelope = signer.envelope(Method::POST, "/auth/login", "{}").unwrap();

        assert!(signer.verify(&envelope.timestamp, "{}", &envelope.signature));
        assert!(!signer.verify(&envelope.timestamp, "{ }", &envelope.signature));
        assert!(!signer.verify(&envelope.timestamp, "{}", "bogus"));
    }

    #[test]
    fn rejects_missing_credentials() {
        assert!(matches!(Credentials::new("", "secret"), Err(CareerCraftError::Config(_))));
        assert!(matches!(Credentials::new("key", ""), Err(CareerCraftError::Config(_))));
    }

    #[test]
    fn debug_hides_secret() {
        let credentials = Credentials::new("key", "hunter2").unwrap();
        let printed = format!("{credentials:?}");
        assert!(printed.contains("key"));
        assert!(!printed.contains("hunter2"));
    }
}
