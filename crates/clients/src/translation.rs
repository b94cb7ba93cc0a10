use std::collections::BTreeMap;

use async_trait::async_trait;
use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::error::ServiceError;
use crate::gateway::GatewayClient;

const SERVICE: &str = "translation";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationRequest {
    /// Field name -> source text; only fields still needing translation.
    pub fields: BTreeMap<String, String>,
    #[serde(rename = "targetLang")]
    pub target_lang: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationResponse {
    #[serde(rename = "translatedFields", default)]
    pub translated_fields: BTreeMap<String, String>,
    #[serde(rename = "detectedSourceLanguage", default)]
    pub detected_source_language: String,
}

#[async_trait]
pub trait TranslationService: Send + Sync {
    /// `POST /translate`.
    async fn translate(&self, request: &TranslationRequest) -> Result<TranslationResponse, ServiceError>;
}

#[async_trait]
impl TranslationService for GatewayClient {
    async fn translate(&self, request: &TranslationRequest) -> Result<TranslationResponse, ServiceError> {
        let url = self.url(SERVICE, &["translate"])?;
        tracing::debug!(target_lang = %request.target_lang, fields = request.fields.len(), "Sending translation request");
        let builder = self
            .request_with_timeout(Method::POST, url, self.config().translation_timeout)
            .json(request);
        let response = Self::send(SERVICE, builder).await?;
        Self::parse_json(SERVICE, response).await
    }
}
