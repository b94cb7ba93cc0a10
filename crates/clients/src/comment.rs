use async_trait::async_trait;
use reqwest::Method;

use crate::error::ServiceError;
use crate::gateway::GatewayClient;
use crate::DeleteOutcome;

const SERVICE: &str = "comment";

/// Comment service: owns the comments threaded on each version.
#[async_trait]
pub trait CommentService: Send + Sync {
    /// `DELETE /comments/version?versionID={id}`, removing every comment
    /// attached to one version in a single call.
    async fn delete_version_comments(&self, version_id: &str) -> Result<DeleteOutcome, ServiceError>;
}

#[async_trait]
impl CommentService for GatewayClient {
    async fn delete_version_comments(&self, version_id: &str) -> Result<DeleteOutcome, ServiceError> {
        let url = self.url(SERVICE, &["comments", "version"])?;
        tracing::debug!(%url, version_id, "Sending delete request to comment service");
        let request = self
            .request(Method::DELETE, url)
            .query(&[("versionID", version_id)]);
        let response = Self::send(SERVICE, request).await?;
        Self::delete_outcome(SERVICE, response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::spawn_gateway;
    use axum::extract::Query;
    use axum::http::StatusCode;
    use axum::routing::delete;
    use axum::Router;
    use std::collections::HashMap;

    async fn fake_comments(Query(q): Query<HashMap<String, String>>) -> StatusCode {
        match q.get("versionID").map(String::as_str) {
            Some("v1") => StatusCode::OK,
            Some("locked") => StatusCode::CONFLICT,
            _ => StatusCode::BAD_REQUEST,
        }
    }

    #[tokio::test]
    async fn passes_version_id_as_query() {
        let client =
            spawn_gateway(Router::new().route("/api/comments/version", delete(fake_comments))).await;
        assert_eq!(
            client.delete_version_comments("v1").await.unwrap(),
            DeleteOutcome::Deleted
        );
        assert!(matches!(
            client.delete_version_comments("locked").await,
            Err(ServiceError::Status { status: 409, .. })
        ));
    }
}
