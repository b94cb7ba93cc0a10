use async_trait::async_trait;
use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::error::ServiceError;
use crate::gateway::GatewayClient;

const SERVICE: &str = "entry";

/// The parts of an entry needed to address notifications.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub id: String,
    pub author: String,
    pub title: String,
}

#[async_trait]
pub trait EntryService: Send + Sync {
    /// `GET /entries/{id}`.
    async fn get_entry(&self, entry_id: &str) -> Result<Entry, ServiceError>;
}

#[async_trait]
impl EntryService for GatewayClient {
    async fn get_entry(&self, entry_id: &str) -> Result<Entry, ServiceError> {
        let url = self.url(SERVICE, &["entries", entry_id])?;
        let response = Self::send(SERVICE, self.request(Method::GET, url)).await?;
        Self::parse_json(SERVICE, response).await
    }
}
