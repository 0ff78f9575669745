// ── Console facade ──
//
// Wires one API client to one store per collection. Construct it once at
// startup and pass it to whatever needs the stores.

use std::sync::Arc;

use qubes_air_api::{ApiClient, Error, HealthResponse, StatusResponse};
use tracing::info;

use crate::config::ConsoleConfig;
use crate::store::{QubeApi, QubeStore, ZoneApi, ZoneStore};

pub struct Console {
    client: Arc<ApiClient>,
    zones: ZoneStore,
    qubes: QubeStore,
}

impl Console {
    pub fn new(config: &ConsoleConfig) -> Result<Self, Error> {
        let client = ApiClient::new(&config.origin, &config.api_base, &config.transport())?;
        info!(api_base = %client.api_base(), "console ready");
        Ok(Self::with_client(Arc::new(client), config))
    }

    /// Build the stores around an already configured client.
    pub fn with_client(client: Arc<ApiClient>, config: &ConsoleConfig) -> Self {
        Self {
            zones: ZoneStore::new(ZoneApi::new(Arc::clone(&client)), config.load_ordering),
            qubes: QubeStore::new(QubeApi::new(Arc::clone(&client)), config.load_ordering),
            client,
        }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn zones(&self) -> &ZoneStore {
        &self.zones
    }

    pub fn qubes(&self) -> &QubeStore {
        &self.qubes
    }

    pub async fn health(&self) -> Result<HealthResponse, Error> {
        self.client.health().await
    }

    pub async fn status(&self) -> Result<StatusResponse, Error> {
        self.client.status().await
    }

    /// Empty both stores (e.g. when switching servers).
    pub fn reset(&self) {
        self.zones.reset();
        self.qubes.reset();
    }
}

impl std::fmt::Debug for Console {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Console")
            .field("api_base", &self.client.api_base().as_str())
            .field("zones", &self.zones)
            .field("qubes", &self.qubes)
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn resolves_api_base_against_origin() {
        let console =
            Console::new(&ConsoleConfig::new("http://10.0.0.5:9000").with_api_base("/api/v2")).unwrap();
        assert_eq!(console.client().api_base().as_str(), "http://10.0.0.5:9000/api/v2/");
        assert!(console.zones().is_empty());
        assert!(console.qubes().is_empty());
    }

    #[test]
    fn rejects_unparseable_origin() {
        let err = Console::new(&ConsoleConfig::new("not a url")).unwrap_err();
        assert!(matches!(err, Error::InvalidUrl(_)));
    }
}
