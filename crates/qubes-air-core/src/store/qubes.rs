use std::sync::Arc;

use qubes_air_api::{
    ApiClient, Error, ListOptions, Qube, QubeCreateRequest, QubeUpdateRequest,
};

use super::resource::{ResourceApi, ResourceStore};

/// Qube collection endpoints behind the [`ResourceApi`] seam.
#[derive(Debug, Clone)]
pub struct QubeApi {
    client: Arc<ApiClient>,
}

impl QubeApi {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }
}

impl ResourceApi for QubeApi {
    type Entity = Qube;
    type Create = QubeCreateRequest;
    type Update = QubeUpdateRequest;

    async fn list(&self, options: &ListOptions) -> Result<Vec<Qube>, Error> {
        Ok(self.client.list_qubes(options).await?.qubes)
    }

    async fn create(&self, request: &QubeCreateRequest) -> Result<Qube, Error> {
        self.client.create_qube(request).await
    }

    async fn update(&self, id: &str, request: &QubeUpdateRequest) -> Result<Qube, Error> {
        self.client.update_qube(id, request).await
    }

    async fn delete(&self, id: &str) -> Result<(), Error> {
        self.client.delete_qube(id).await
    }
}

pub type QubeStore = ResourceStore<QubeApi>;

impl ResourceStore<QubeApi> {
    /// Start on the server. The returned qube carries whatever status the
    /// server reports; it is not assumed to be `running` yet.
    pub async fn start(&self, id: &str) -> Result<Arc<Qube>, Error> {
        self.reconcile(id, "start", self.api().client.start_qube(id))
            .await
    }

    pub async fn stop(&self, id: &str) -> Result<Arc<Qube>, Error> {
        self.reconcile(id, "stop", self.api().client.stop_qube(id))
            .await
    }
}
