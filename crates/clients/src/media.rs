use async_trait::async_trait;
use reqwest::Method;

use crate::error::ServiceError;
use crate::gateway::GatewayClient;
use crate::DeleteOutcome;

const SERVICE: &str = "media";

/// Media service: owns uploaded files referenced by versions.
#[async_trait]
pub trait MediaService: Send + Sync {
    /// `DELETE /media/{id}`.
    async fn delete_media(&self, media_id: &str) -> Result<DeleteOutcome, ServiceError>;
}

#[async_trait]
impl MediaService for GatewayClient {
    async fn delete_media(&self, media_id: &str) -> Result<DeleteOutcome, ServiceError> {
        let url = self.url(SERVICE, &["media", media_id])?;
        tracing::debug!(%url, media_id, "Sending delete request to media service");
        let response = Self::send(SERVICE, self.request(Method::DELETE, url)).await?;
        Self::delete_outcome(SERVICE, response).await
    }
}
