// Zone endpoints: CRUD plus connect/disconnect.

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{ListOptions, Zone, ZoneCreateRequest, ZoneListResponse, ZoneUpdateRequest};

impl ApiClient {
    /// `GET <prefix>/zones` with optional filters.
    pub async fn list_zones(&self, options: &ListOptions) -> Result<ZoneListResponse, Error> {
        let url = self.endpoint(&["zones"])?;
        self.get_with_query(url, options).await
    }

    pub async fn get_zone(&self, id: &str) -> Result<Zone, Error> {
        let url = self.endpoint(&["zones", id])?;
        self.get(url).await
    }

    pub async fn create_zone(&self, request: &ZoneCreateRequest) -> Result<Zone, Error> {
        let url = self.endpoint(&["zones"])?;
        self.post(url, request).await
    }

    pub async fn update_zone(&self, id: &str, request: &ZoneUpdateRequest) -> Result<Zone, Error> {
        let url = self.endpoint(&["zones", id])?;
        self.put(url, request).await
    }

    pub async fn delete_zone(&self, id: &str) -> Result<(), Error> {
        let url = self.endpoint(&["zones", id])?;
        self.delete(url).await
    }

    /// Ask the server to connect the zone; returns the zone with its new status.
    pub async fn connect_zone(&self, id: &str) -> Result<Zone, Error> {
        let url = self.endpoint(&["zones", id, "connect"])?;
        self.post_empty(url).await
    }

    pub async fn disconnect_zone(&self, id: &str) -> Result<Zone, Error> {
        let url = self.endpoint(&["zones", id, "disconnect"])?;
        self.post_empty(url).await
    }
}
