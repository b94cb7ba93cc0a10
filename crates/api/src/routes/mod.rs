pub mod health;
pub mod versions;

use axum::Router;

use crate::state::AppState;

/// Service routes, mounted under `/api`.
///
/// ```text
/// /versions                 version resource and its pipelines
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/versions", versions::router())
}
