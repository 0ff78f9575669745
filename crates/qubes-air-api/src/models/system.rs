// ── System endpoints ──

use serde::{Deserialize, Serialize};

/// `GET /health` payload.
///
/// Deployed servers report `version` instead of `timestamp`; both are
/// accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    #[serde(default)]
    pub database: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl HealthResponse {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

/// `GET <prefix>/status` payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusResponse {
    #[serde(default, alias = "name")]
    pub app: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub zones_count: u64,
    #[serde(default)]
    pub qubes_count: u64,
}
