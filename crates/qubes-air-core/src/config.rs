// Runtime configuration consumed by `Console::new`.
//
// Kept free of any file/env loading: `qubes-air-config` (or an embedding
// application) builds one of these and hands it over.

use std::time::Duration;

use qubes_air_api::{DEFAULT_API_BASE, TransportConfig};
use serde::{Deserialize, Serialize};

/// Environment variable that overrides the API base path or URL.
pub const API_BASE_ENV: &str = "QUBES_AIR_API_BASE_URL";

/// Default console origin for a local development server.
pub const DEFAULT_ORIGIN: &str = "http://127.0.0.1:8080";

/// How a store reconciles overlapping `load` calls.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LoadOrdering {
    /// Whichever response arrives last is applied, even if it answers an
    /// older request.
    #[default]
    LastCompletion,
    /// Only the most recently issued load may apply its result; responses to
    /// superseded loads are dropped.
    LatestRequest,
}

/// Everything needed to build a [`Console`](crate::Console).
#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    /// Scheme, host and port of the console server. `/health` lives here.
    pub origin: String,
    /// Versioned prefix (`/api/v1`) or an absolute URL.
    pub api_base: String,
    /// Per-request deadline enforced by the HTTP client.
    pub timeout: Duration,
    pub accept_invalid_certs: bool,
    pub load_ordering: LoadOrdering,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            origin: DEFAULT_ORIGIN.to_owned(),
            api_base: DEFAULT_API_BASE.to_owned(),
            timeout: Duration::from_secs(30),
            accept_invalid_certs: false,
            load_ordering: LoadOrdering::default(),
        }
    }
}

impl ConsoleConfig {
    pub fn new(origin: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            ..Self::default()
        }
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_load_ordering(mut self, ordering: LoadOrdering) -> Self {
        self.load_ordering = ordering;
        self
    }

    /// Apply `QUBES_AIR_API_BASE_URL` if it is set and non-empty.
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(base) = std::env::var(API_BASE_ENV)
            .ok()
            .filter(|base| !base.trim().is_empty())
        {
            self.api_base = base;
        }
        self
    }

    pub(crate) fn transport(&self) -> TransportConfig {
        TransportConfig {
            timeout: self.timeout,
            accept_invalid_certs: self.accept_invalid_certs,
            ..TransportConfig::default()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn defaults_target_local_dev_server() {
        let config = ConsoleConfig::default();
        assert_eq!(config.origin, "http://127.0.0.1:8080");
        assert_eq!(config.api_base, "/api/v1");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.load_ordering, LoadOrdering::LastCompletion);
    }

    #[test]
    fn load_ordering_uses_kebab_case() {
        let parsed: LoadOrdering = serde_json::from_str("\"latest-request\"").unwrap();
        assert_eq!(parsed, LoadOrdering::LatestRequest);
        assert_eq!(
            serde_json::to_string(&LoadOrdering::LastCompletion).unwrap(),
            "\"last-completion\""
        );
    }

    #[test]
    fn transport_carries_timeout_and_tls_choice() {
        let mut config = ConsoleConfig::new("https://console.lan").with_timeout(Duration::from_secs(5));
        config.accept_invalid_certs = true;
        let transport = config.transport();
        assert_eq!(transport.timeout, Duration::from_secs(5));
        assert!(transport.accept_invalid_certs);
    }
}
