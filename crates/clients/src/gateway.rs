//! HTTP plumbing shared by every collaborator client.

use std::time::Duration;

use reqwest::{Method, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;

use crate::config::ServiceConfig;
use crate::error::ServiceError;
use crate::{DeleteOutcome, INTERNAL_AUTH_HEADER};

/// Client for every collaborator reachable through the API gateway.
pub struct GatewayClient {
    client: reqwest::Client,
    config: ServiceConfig,
}

impl GatewayClient {
    pub fn new(config: ServiceConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    pub(crate) fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// `{gateway}/api/{segments...}` with each segment percent-encoded.
    pub(crate) fn url(&self, service: &'static str, segments: &[&str]) -> Result<Url, ServiceError> {
        let invalid = |message: String| ServiceError::InvalidUrl { service, message };

        let mut url = Url::parse(&self.config.gateway_url).map_err(|e| invalid(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|()| invalid("gateway URL cannot be a base".into()))?
            .pop_if_empty()
            .push("api")
            .extend(segments);
        Ok(url)
    }

    /// Build an authenticated request with the default service timeout.
    pub(crate) fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.request_with_timeout(method, url, self.config.service_timeout)
    }

    pub(crate) fn request_with_timeout(
        &self,
        method: Method,
        url: Url,
        timeout: Duration,
    ) -> RequestBuilder {
        self.client
            .request(method, url)
            .header(INTERNAL_AUTH_HEADER, &self.config.internal_secret)
            .timeout(timeout)
    }

    pub(crate) async fn send(
        service: &'static str,
        request: RequestBuilder,
    ) -> Result<Response, ServiceError> {
        request
            .send()
            .await
            .map_err(|source| ServiceError::Request { service, source })
    }

    /// Map a delete response: 200/204 deleted, 404 already absent, anything
    /// else is a hard failure.
    pub(crate) async fn delete_outcome(
        service: &'static str,
        response: Response,
    ) -> Result<DeleteOutcome, ServiceError> {
        match response.status() {
            StatusCode::OK | StatusCode::NO_CONTENT => Ok(DeleteOutcome::Deleted),
            StatusCode::NOT_FOUND => Ok(DeleteOutcome::AlreadyAbsent),
            _ => Err(Self::status_error(service, response).await),
        }
    }

    /// Require exactly `200 OK`.
    pub(crate) async fn ensure_ok(
        service: &'static str,
        response: Response,
    ) -> Result<Response, ServiceError> {
        if response.status() == StatusCode::OK {
            Ok(response)
        } else {
            Err(Self::status_error(service, response).await)
        }
    }

    pub(crate) async fn parse_json<T: DeserializeOwned>(
        service: &'static str,
        response: Response,
    ) -> Result<T, ServiceError> {
        let response = Self::ensure_ok(service, response).await?;
        response.json::<T>().await.map_err(|e| ServiceError::Decode {
            service,
            message: e.to_string(),
        })
    }

    async fn status_error(service: &'static str, response: Response) -> ServiceError {
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".to_string());
        ServiceError::Status {
            service,
            status,
            body,
        }
    }
}
