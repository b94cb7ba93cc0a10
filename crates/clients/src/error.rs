use lawiki_core::error::CoreError;

/// Errors from calling a collaborator.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Network failure, DNS, TLS or timeout.
    #[error("{service} request failed: {source}")]
    Request {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// Status outside the tolerated set.
    #[error("{service} returned HTTP {status}: {body}")]
    Status {
        service: &'static str,
        status: u16,
        body: String,
    },

    #[error("{service} response could not be decoded: {message}")]
    Decode {
        service: &'static str,
        message: String,
    },

    #[error("Invalid {service} URL: {message}")]
    InvalidUrl {
        service: &'static str,
        message: String,
    },
}

impl ServiceError {
    pub fn service(&self) -> &'static str {
        match self {
            Self::Request { service, .. }
            | Self::Status { service, .. }
            | Self::Decode { service, .. }
            | Self::InvalidUrl { service, .. } => service,
        }
    }
}

impl From<ServiceError> for CoreError {
    fn from(err: ServiceError) -> Self {
        CoreError::Dependency {
            service: err.service(),
            message: err.to_string(),
        }
    }
}
