//! Route definitions for the version resource, registered as `/versions`.

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::versions;
use crate::routes::health;
use crate::state::AppState;

/// ```text
/// GET    /                  list_versions
/// POST   /                  create_version
/// GET    /health            liveness probe (plain `OK`)
/// GET    /search            search_versions
/// DELETE /entry             delete_entry_versions (internal)
/// GET    /{id}              get_version
/// PUT    /{id}              update_version
/// DELETE /{id}              delete_version
/// POST   /{id}/translate    translate_version
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(versions::list_versions).post(versions::create_version),
        )
        .route("/health", get(health::liveness))
        .route("/search", get(versions::search_versions))
        .route("/entry", delete(versions::delete_entry_versions))
        .route(
            "/{id}",
            get(versions::get_version)
                .put(versions::update_version)
                .delete(versions::delete_version),
        )
        .route("/{id}/translate", post(versions::translate_version))
}
