//! Domain logic for the version service.
//!
//! Everything here is free of I/O so the store, the collaborator clients,
//! the cascade pipelines and the HTTP layer can share one set of rules.

pub mod error;
pub mod media;
pub mod notification;
pub mod search;
pub mod translation;
pub mod types;
pub mod version;
