//! Cross-service consistency for version mutations.
//!
//! [`CascadeOrchestrator`] runs the create, update, delete and bulk
//! delete-by-entry pipelines: dependent resources in other services are
//! removed in a fixed order (media, then comments, then the version) and the
//! first failure stops the pipeline without compensating completed steps.
//! [`TranslationEngine`] merges per-language translations into a version.

pub mod cascade;
pub mod error;
pub mod translate;

#[cfg(test)]
pub(crate) mod test_support;

pub use cascade::{CascadeOrchestrator, Deletion};
pub use error::PipelineError;
pub use translate::{TranslationEngine, TranslationOutcome};
