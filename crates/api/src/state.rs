use std::sync::Arc;

use lawiki_db::VersionStore;
use lawiki_pipeline::{CascadeOrchestrator, TranslationEngine};

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: every member is an `Arc` or wraps `Arc`s.
#[derive(Clone)]
pub struct AppState {
    /// Version Store, used directly for reads.
    pub store: Arc<dyn VersionStore>,
    /// Create/update/delete pipelines.
    pub orchestrator: CascadeOrchestrator,
    pub translator: TranslationEngine,
    pub config: Arc<ServerConfig>,
}
