// ── Zone wire types ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::Resource;

/// Infrastructure provider behind a zone.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ZoneType {
    Proxmox,
    Gcp,
    Aws,
    Azure,
}

/// Connectivity as last reported by the server.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ZoneStatus {
    Connected,
    Disconnected,
}

/// Provider-specific connection settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneConfig {
    #[serde(default)]
    pub endpoint: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_key: Option<String>,
}

impl ZoneConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Self::default()
        }
    }
}

/// A registered connection to a hypervisor or cloud provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Zone {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub zone_type: ZoneType,
    pub status: ZoneStatus,
    #[serde(default)]
    pub config: ZoneConfig,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Zone {
    pub fn is_connected(&self) -> bool {
        self.status == ZoneStatus::Connected
    }
}

impl Resource for Zone {
    const KIND: &'static str = "zones";

    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneCreateRequest {
    pub name: String,
    #[serde(rename = "type")]
    pub zone_type: ZoneType,
    pub config: ZoneConfig,
}

/// Partial patch: `None` fields are left out of the body entirely.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneUpdateRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<ZoneConfig>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn zone_deserializes_wire_names() {
        let zone: Zone = serde_json::from_value(json!({
            "id": "z1",
            "name": "lab",
            "type": "proxmox",
            "status": "disconnected",
            "config": { "endpoint": "https://pve.local:8006", "region": "home" },
            "created_at": "2025-01-10T08:00:00Z",
            "updated_at": "2025-01-10T08:00:00Z"
        }))
        .unwrap();

        assert_eq!(zone.zone_type, ZoneType::Proxmox);
        assert_eq!(zone.status, ZoneStatus::Disconnected);
        assert_eq!(zone.config.region.as_deref(), Some("home"));
        assert!(zone.config.project.is_none());
        assert!(!zone.is_connected());
    }

    #[test]
    fn update_request_omits_absent_fields() {
        let patch = ZoneUpdateRequest {
            name: Some("renamed".into()),
            config: None,
        };
        assert_eq!(serde_json::to_value(&patch).unwrap(), json!({ "name": "renamed" }));
    }

    #[test]
    fn zone_type_parses_case_insensitively() {
        assert_eq!("GCP".parse::<ZoneType>().unwrap(), ZoneType::Gcp);
        assert_eq!(ZoneType::Azure.to_string(), "azure");
        assert!("vmware".parse::<ZoneType>().is_err());
    }
}
