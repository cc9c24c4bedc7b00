//! Health check models

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub service: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub environment: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub checks: Map<String, Value>,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        matches!(self.status.as_str(), "healthy" | "ok" | "ready" | "alive")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailedHealth {
    #[serde(flatten)]
    pub summary: HealthStatus,
    #[serde(default)]
    pub uptime: Option<String>,
    #[serde(default)]
    pub configuration: Option<Map<String, Value>>,
    #[serde(default)]
    pub security: Option<Map<String, Value>>,
    #[serde(default)]
    pub dependencies: Option<Map<String, Value>>,
    #[serde(default)]
    pub performance: Option<Map<String, Value>>,
}
