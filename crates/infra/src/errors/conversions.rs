//! Conversions from external infrastructure errors into domain errors.

use careercraft_core::{Failure, TransportKind};
use careercraft_domain::CareerCraftError;
use reqwest::Error as HttpError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub CareerCraftError);

impl From<InfraError> for CareerCraftError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<CareerCraftError> for InfraError {
    fn from(value: CareerCraftError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoCareerCraftError {
    fn into_careercraft(self) -> CareerCraftError;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → CareerCraftError */
/* -------------------------------------------------------------------------- */

impl IntoCareerCraftError for HttpError {
    fn into_careercraft(self) -> CareerCraftError {
        if self.is_builder() {
            return CareerCraftError::Config(format!("invalid HTTP client settings: {self}"));
        }
        CareerCraftError::Network(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_careercraft())
    }
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → Failure */
/* -------------------------------------------------------------------------- */

/// Describe a transport error (no usable response) for the classifier.
pub fn transport_failure(err: &HttpError) -> Failure {
    let kind = if err.is_timeout() {
        TransportKind::Timeout
    } else if err.is_connect() {
        TransportKind::Connect
    } else {
        TransportKind::Other
    };

    Failure::Transport { kind, message: error_chain(err) }
}

fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */

#[cfg(test)]
mod tests {
    use reqwest::Client;
    use tokio::runtime::Runtime;

    use super::*;

    #[test]
    fn builder_errors_map_to_config() {
        let error = Client::new().get("not a url").build().unwrap_err();
        assert!(error.is_builder());

        let mapped: CareerCraftError = InfraError::from(error).into();
        assert!(matches!(mapped, CareerCraftError::Config(ref msg) if msg.contains("HTTP client")));
    }

    #[test]
    fn refused_connection_is_a_connect_failure() {
        Runtime::new().unwrap().block_on(async {
            // Bind then drop to get a port nobody listens on.
            let port = std::net::TcpListener::bind("127.0.0.1:0")
                .unwrap()
                .local_addr()
                .unwrap()
                .port();

            let client = Client::builder().no_proxy().build().unwrap();
            let error = client.get(format!("http://127.0.0.1:{port}/")).send().await.unwrap_err();

            match transport_failure(&error) {
                Failure::Transport { kind, message } => {
                    assert_eq!(kind, TransportKind::Connect);
                    assert!(!message.is_empty());
                }
                other => panic!("expected transport failure, got {:?}", other),
            }
        });
    }
}
