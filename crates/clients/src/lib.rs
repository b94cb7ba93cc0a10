//! Clients for the services the version service depends on.
//!
//! Every collaborator is reached through the API gateway over HTTP with the
//! shared-secret `X-Internal-Auth` header and a per-call timeout. Each one
//! sits behind an `async_trait` seam so the pipelines can be exercised
//! against in-process fakes.

use std::sync::Arc;

pub mod comment;
pub mod config;
pub mod entry;
pub mod error;
pub mod gateway;
pub mod media;
pub mod translation;
pub mod user;

pub use comment::CommentService;
pub use config::ServiceConfig;
pub use entry::{Entry, EntryService};
pub use error::ServiceError;
pub use gateway::GatewayClient;
pub use media::MediaService;
pub use translation::{TranslationRequest, TranslationResponse, TranslationService};
pub use user::{User, UserService};

/// Header carrying the shared secret on internal calls.
pub const INTERNAL_AUTH_HEADER: &str = "X-Internal-Auth";

/// Result of a delete against a dependent service.
///
/// Both variants count as success for cascade purposes, which keeps retries
/// of a partially completed cascade idempotent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    AlreadyAbsent,
}

/// The full set of collaborators, shared across handlers and workers.
#[derive(Clone)]
pub struct Collaborators {
    pub media: Arc<dyn MediaService>,
    pub comments: Arc<dyn CommentService>,
    pub entries: Arc<dyn EntryService>,
    pub users: Arc<dyn UserService>,
    pub translation: Arc<dyn TranslationService>,
}

impl Collaborators {
    /// Route every collaborator through one gateway client.
    pub fn from_gateway(client: Arc<GatewayClient>) -> Self {
        Self {
            media: client.clone(),
            comments: client.clone(),
            entries: client.clone(),
            users: client.clone(),
            translation: client,
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support;
