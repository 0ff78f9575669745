// Qube endpoints: CRUD plus start/stop.

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{ListOptions, Qube, QubeCreateRequest, QubeListResponse, QubeUpdateRequest};

impl ApiClient {
    /// `GET <prefix>/qubes` with optional filters (`zone_id` narrows to one zone).
    pub async fn list_qubes(&self, options: &ListOptions) -> Result<QubeListResponse, Error> {
        let url = self.endpoint(&["qubes"])?;
        self.get_with_query(url, options).await
    }

    pub async fn get_qube(&self, id: &str) -> Result<Qube, Error> {
        let url = self.endpoint(&["qubes", id])?;
        self.get(url).await
    }

    pub async fn create_qube(&self, request: &QubeCreateRequest) -> Result<Qube, Error> {
        let url = self.endpoint(&["qubes"])?;
        self.post(url, request).await
    }

    pub async fn update_qube(&self, id: &str, request: &QubeUpdateRequest) -> Result<Qube, Error> {
        let url = self.endpoint(&["qubes", id])?;
        self.put(url, request).await
    }

    pub async fn delete_qube(&self, id: &str) -> Result<(), Error> {
        let url = self.endpoint(&["qubes", id])?;
        self.delete(url).await
    }

    pub async fn start_qube(&self, id: &str) -> Result<Qube, Error> {
        let url = self.endpoint(&["qubes", id, "start"])?;
        self.post_empty(url).await
    }

    pub async fn stop_qube(&self, id: &str) -> Result<Qube, Error> {
        let url = self.endpoint(&["qubes", id, "stop"])?;
        self.post_empty(url).await
    }
}
