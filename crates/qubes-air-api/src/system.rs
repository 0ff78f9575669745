// System endpoints: health probe and application status.

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{HealthResponse, StatusResponse};

impl ApiClient {
    /// `GET /health` on the origin, never under the versioned prefix.
    pub async fn health(&self) -> Result<HealthResponse, Error> {
        let url = self.root_endpoint("/health")?;
        self.get(url).await
    }

    /// `GET <prefix>/status`.
    pub async fn status(&self) -> Result<StatusResponse, Error> {
        let url = self.endpoint(&["status"])?;
        self.get(url).await
    }
}
