// ── List options and envelopes ──

use serde::{Deserialize, Deserializer, Serialize};

use super::{Qube, Zone};

/// Pagination and filtering for list endpoints.
///
/// Unset, zero, and empty values are never sent: the query string only
/// carries the filters the caller actually asked for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListOptions {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub status: Option<String>,
    pub resource_type: Option<String>,
    pub zone_id: Option<String>,
}

impl ListOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    pub fn page_size(mut self, page_size: u32) -> Self {
        self.page_size = Some(page_size);
        self
    }

    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn resource_type(mut self, resource_type: impl Into<String>) -> Self {
        self.resource_type = Some(resource_type.into());
        self
    }

    pub fn zone_id(mut self, zone_id: impl Into<String>) -> Self {
        self.zone_id = Some(zone_id.into());
        self
    }

    /// Query parameters in wire order: `page`, `page_size`, `status`, `type`, `zone_id`.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let numbers = [("page", self.page), ("page_size", self.page_size)];
        let strings = [
            ("status", &self.status),
            ("type", &self.resource_type),
            ("zone_id", &self.zone_id),
        ];

        let mut pairs: Vec<(&'static str, String)> = numbers
            .into_iter()
            .filter_map(|(key, value)| {
                value
                    .filter(|v| *v > 0)
                    .map(|v| (key, v.to_string()))
            })
            .collect();
        pairs.extend(strings.into_iter().filter_map(|(key, value)| {
            value
                .as_deref()
                .filter(|v| !v.is_empty())
                .map(|v| (key, v.to_owned()))
        }));
        pairs
    }

    /// Encoded query string including the leading `?`, or empty when no
    /// option is set.
    pub fn query_string(&self) -> String {
        let pairs = self.query_pairs();
        if pairs.is_empty() {
            return String::new();
        }
        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        for (key, value) in &pairs {
            serializer.append_pair(key, value);
        }
        format!("?{}", serializer.finish())
    }
}

/// `GET <prefix>/zones` envelope.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneListResponse {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub zones: Vec<Zone>,
    #[serde(default)]
    pub total: u64,
}

/// `GET <prefix>/qubes` envelope.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QubeListResponse {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub qubes: Vec<Qube>,
    #[serde(default)]
    pub total: u64,
}

// Go servers encode an empty slice as `null`.
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn empty_options_produce_no_query() {
        assert_eq!(ListOptions::new().query_string(), "");
        assert!(ListOptions::default().query_pairs().is_empty());
    }

    #[test]
    fn only_set_options_are_emitted() {
        let options = ListOptions::new().page(2).status("running");
        assert_eq!(options.query_string(), "?page=2&status=running");
    }

    #[test]
    fn zero_and_empty_values_are_dropped() {
        let options = ListOptions {
            page: Some(0),
            page_size: Some(0),
            status: Some(String::new()),
            resource_type: Some("gpu".into()),
            zone_id: Some(String::new()),
        };
        assert_eq!(options.query_string(), "?type=gpu");
    }

    #[test]
    fn all_options_use_wire_names() {
        let options = ListOptions::new()
            .page(1)
            .page_size(50)
            .status("stopped")
            .resource_type("dev")
            .zone_id("zone a");
        assert_eq!(
            options.query_string(),
            "?page=1&page_size=50&status=stopped&type=dev&zone_id=zone+a"
        );
    }

    #[test]
    fn missing_or_null_collection_is_empty() {
        let resp: ZoneListResponse = serde_json::from_str(r#"{"total": 0}"#).unwrap();
        assert!(resp.zones.is_empty());

        let resp: QubeListResponse =
            serde_json::from_str(r#"{"qubes": null, "total": 0}"#).unwrap();
        assert!(resp.qubes.is_empty());
    }
}
