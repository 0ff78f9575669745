use std::sync::Arc;

use qubes_air_api::{
    ApiClient, Error, ListOptions, Zone, ZoneCreateRequest, ZoneUpdateRequest,
};

use super::resource::{ResourceApi, ResourceStore};

/// Zone collection endpoints behind the [`ResourceApi`] seam.
#[derive(Debug, Clone)]
pub struct ZoneApi {
    client: Arc<ApiClient>,
}

impl ZoneApi {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }
}

impl ResourceApi for ZoneApi {
    type Entity = Zone;
    type Create = ZoneCreateRequest;
    type Update = ZoneUpdateRequest;

    async fn list(&self, options: &ListOptions) -> Result<Vec<Zone>, Error> {
        Ok(self.client.list_zones(options).await?.zones)
    }

    async fn create(&self, request: &ZoneCreateRequest) -> Result<Zone, Error> {
        self.client.create_zone(request).await
    }

    async fn update(&self, id: &str, request: &ZoneUpdateRequest) -> Result<Zone, Error> {
        self.client.update_zone(id, request).await
    }

    async fn delete(&self, id: &str) -> Result<(), Error> {
        self.client.delete_zone(id).await
    }
}

pub type ZoneStore = ResourceStore<ZoneApi>;

impl ResourceStore<ZoneApi> {
    /// Connect on the server and adopt the returned zone (with its new status).
    pub async fn connect(&self, id: &str) -> Result<Arc<Zone>, Error> {
        self.reconcile(id, "connect", self.api().client.connect_zone(id))
            .await
    }

    pub async fn disconnect(&self, id: &str) -> Result<Arc<Zone>, Error> {
        self.reconcile(id, "disconnect", self.api().client.disconnect_zone(id))
            .await
    }
}
