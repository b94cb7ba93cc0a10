use std::time::Duration;

/// Default per-call timeout for media, comment, entry and user calls.
const DEFAULT_SERVICE_TIMEOUT_SECS: u64 = 5;

/// Default per-call timeout for the translation backend.
const DEFAULT_TRANSLATION_TIMEOUT_SECS: u64 = 10;

/// Collaborator endpoints and credentials.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Gateway base URL; collaborator paths are appended under `/api`.
    pub gateway_url: String,
    /// Shared secret sent as `X-Internal-Auth`.
    pub internal_secret: String,
    pub service_timeout: Duration,
    pub translation_timeout: Duration,
}

impl ServiceConfig {
    /// Load configuration from environment variables.
    ///
    /// | Env Var                    | Default                 |
    /// |----------------------------|-------------------------|
    /// | `API_GATEWAY_URL`          | `http://localhost:8000` |
    /// | `INTERNAL_AUTH_SECRET`     | required                |
    /// | `SERVICE_TIMEOUT_SECS`     | `5`                     |
    /// | `TRANSLATION_TIMEOUT_SECS` | `10`                    |
    pub fn from_env() -> Self {
        let gateway_url = std::env::var("API_GATEWAY_URL")
            .unwrap_or_else(|_| "http://localhost:8000".into())
            .trim_end_matches('/')
            .to_string();

        let internal_secret =
            std::env::var("INTERNAL_AUTH_SECRET").expect("INTERNAL_AUTH_SECRET must be set");

        let service_timeout_secs: u64 = std::env::var("SERVICE_TIMEOUT_SECS")
            .unwrap_or_else(|_| DEFAULT_SERVICE_TIMEOUT_SECS.to_string())
            .parse()
            .expect("SERVICE_TIMEOUT_SECS must be a valid u64");

        let translation_timeout_secs: u64 = std::env::var("TRANSLATION_TIMEOUT_SECS")
            .unwrap_or_else(|_| DEFAULT_TRANSLATION_TIMEOUT_SECS.to_string())
            .parse()
            .expect("TRANSLATION_TIMEOUT_SECS must be a valid u64");

        Self {
            gateway_url,
            internal_secret,
            service_timeout: Duration::from_secs(service_timeout_secs),
            translation_timeout: Duration::from_secs(translation_timeout_secs),
        }
    }

    /// Configuration with default timeouts, for wiring up in code.
    pub fn new(gateway_url: impl Into<String>, internal_secret: impl Into<String>) -> Self {
        Self {
            gateway_url: gateway_url.into().trim_end_matches('/').to_string(),
            internal_secret: internal_secret.into(),
            service_timeout: Duration::from_secs(DEFAULT_SERVICE_TIMEOUT_SECS),
            translation_timeout: Duration::from_secs(DEFAULT_TRANSLATION_TIMEOUT_SECS),
        }
    }
}
