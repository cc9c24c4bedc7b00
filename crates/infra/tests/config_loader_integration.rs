//! Integration tests for configuration loading into a working client

use std::fs;

use careercraft_domain::Environment;
use careercraft_infra::config::{load_from_file, load_from_source, MapSource};
use careercraft_infra::ApiClient;
use tempfile::tempdir;

#[test]
fn environment_source_builds_a_client() {
    let source: MapSource = [
        ("CAREERCRAFT_API_BASE_URL", "https://api.careercraft.test"),
        ("CAREERCRAFT_API_KEY", "key"),
        ("CAREERCRAFT_API_SECRET", "secret"),
        ("CAREERCRAFT_ENVIRONMENT", "production"),
    ]
    .into_iter()
    .collect();

    let config = load_from_source(&source).unwrap();
    assert_eq!(config.flags.environment, Environment::Production);

    let client = ApiClient::new(config).unwrap();
    assert_eq!(client.http().base_url(), "https://api.careercraft.test");
}

#[test]
fn file_without_credentials_fails_at_construction() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("careercraft.json");
    fs::write(&path, r#"{"api_key": "key", "api_secret": ""}"#).unwrap();

    let config = load_from_file(Some(path)).unwrap();
    assert!(ApiClient::new(config).is_err());
}

#[test]
fn malformed_base_url_fails_at_construction() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("careercraft.toml");
    fs::write(&path, "base_url = \"not a url\"\napi_key = \"k\"\napi_secret = \"s\"\n").unwrap();

    let config = load_from_file(Some(path)).unwrap();
    assert!(ApiClient::new(config).is_err());
}
