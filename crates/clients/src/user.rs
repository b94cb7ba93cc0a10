use async_trait::async_trait;
use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::error::ServiceError;
use crate::gateway::GatewayClient;

const SERVICE: &str = "user";

/// A user as returned by the auth service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    /// Prefers email over in-app notifications.
    #[serde(default, alias = "enableMails")]
    pub enable_mails: bool,
}

#[async_trait]
pub trait UserService: Send + Sync {
    /// `GET /auth/user?id={id}`.
    async fn get_user(&self, user_id: &str) -> Result<User, ServiceError>;

    /// `POST /auth/notifications?id={id}` with `{ "notification": message }`.
    async fn send_notification(&self, user_id: &str, message: &str) -> Result<(), ServiceError>;
}

#[async_trait]
impl UserService for GatewayClient {
    async fn get_user(&self, user_id: &str) -> Result<User, ServiceError> {
        let url = self.url(SERVICE, &["auth", "user"])?;
        let request = self.request(Method::GET, url).query(&[("id", user_id)]);
        let response = Self::send(SERVICE, request).await?;
        Self::parse_json(SERVICE, response).await
    }

    async fn send_notification(&self, user_id: &str, message: &str) -> Result<(), ServiceError> {
        let url = self.url(SERVICE, &["auth", "notifications"])?;
        let request = self
            .request(Method::POST, url)
            .query(&[("id", user_id)])
            .json(&serde_json::json!({ "notification": message }));
        let response = Self::send(SERVICE, request).await?;
        Self::ensure_ok(SERVICE, response).await?;
        Ok(())
    }
}
