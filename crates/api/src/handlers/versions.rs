//! Handlers for the version resource.
//!
//! Reads go straight to the Version Store; every mutation runs through the
//! cascade or translation pipeline.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use lawiki_core::search::VersionFilter;
use lawiki_core::types::parse_version_id;
use lawiki_db::models::version::{CreateVersion, UpdateVersion};
use lawiki_pipeline::Deletion;

use crate::error::{AppError, AppResult};
use crate::extract::{ApiJson, ApiQuery};
use crate::middleware::internal_auth::InternalCaller;
use crate::response::DataResponse;
use crate::state::AppState;

/* --------------------------------------------------------------------------
Query param types
-------------------------------------------------------------------------- */

/// Search parameters. `editor` may repeat, so the raw pairs are collected
/// first and folded here.
#[derive(Debug, Default, PartialEq)]
pub struct SearchParams {
    pub content: Option<String>,
    pub editors: Vec<String>,
    pub created_at_from: Option<String>,
    pub created_at_to: Option<String>,
    pub entry_id: Option<String>,
}

impl SearchParams {
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut params = Self::default();
        for (key, value) in pairs {
            match key.as_str() {
                "content" => params.content = Some(value),
                "editor" => params.editors.push(value),
                "createdAtFrom" => params.created_at_from = Some(value),
                "createdAtTo" => params.created_at_to = Some(value),
                "entryID" => params.entry_id = Some(value),
                _ => {}
            }
        }
        params
    }

    fn into_filter(self) -> Result<VersionFilter, lawiki_core::error::CoreError> {
        VersionFilter::parse(
            self.content.as_deref(),
            &self.editors,
            self.created_at_from.as_deref(),
            self.created_at_to.as_deref(),
            self.entry_id.as_deref(),
        )
    }
}

#[derive(Debug, serde::Deserialize)]
pub struct EntryParams {
    #[serde(rename = "entryID")]
    pub entry_id: Option<String>,
}

#[derive(Debug, serde::Deserialize)]
pub struct TranslateParams {
    #[serde(rename = "targetLang")]
    pub target_lang: Option<String>,
}

/* --------------------------------------------------------------------------
Helpers
-------------------------------------------------------------------------- */

/// 204 for an empty collection, otherwise the enveloped list.
fn list_response<T: serde::Serialize>(items: Vec<T>) -> Response {
    if items.is_empty() {
        StatusCode::NO_CONTENT.into_response()
    } else {
        Json(DataResponse { data: items }).into_response()
    }
}

/* --------------------------------------------------------------------------
Reads
-------------------------------------------------------------------------- */

/// GET /versions
pub async fn list_versions(State(state): State<AppState>) -> AppResult<Response> {
    let versions = state.store.list().await?;
    Ok(list_response(versions))
}

/// GET /versions/{id}
pub async fn get_version(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let id = parse_version_id(&id)?;
    let version = state
        .store
        .get(id)
        .await?
        .ok_or_else(|| lawiki_core::error::CoreError::not_found("Version", id))?;

    Ok(Json(DataResponse { data: version }))
}

/// GET /versions/search?content=&editor=&createdAtFrom=&createdAtTo=&entryID=
///
/// All constraints are conjunctive; results are newest first.
pub async fn search_versions(
    State(state): State<AppState>,
    ApiQuery(pairs): ApiQuery<Vec<(String, String)>>,
) -> AppResult<Response> {
    let filter = SearchParams::from_pairs(pairs).into_filter()?;
    let versions = state.store.find(&filter).await?;

    tracing::debug!(results = versions.len(), "Version search");
    Ok(list_response(versions))
}

/* --------------------------------------------------------------------------
Mutations
-------------------------------------------------------------------------- */

/// POST /versions
pub async fn create_version(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<CreateVersion>,
) -> AppResult<impl IntoResponse> {
    let version = state.orchestrator.create(input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: version })))
}

/// PUT /versions/{id}
///
/// 204 when the version was deleted concurrently before the commit.
pub async fn update_version(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(input): ApiJson<UpdateVersion>,
) -> AppResult<Response> {
    let id = parse_version_id(&id)?;
    match state.orchestrator.update(id, input).await? {
        Some(version) => Ok(Json(DataResponse { data: version }).into_response()),
        None => Ok(StatusCode::NO_CONTENT.into_response()),
    }
}

/// DELETE /versions/{id}
pub async fn delete_version(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    let id = parse_version_id(&id)?;
    match state.orchestrator.delete(id).await? {
        Deletion::Removed(_) | Deletion::AlreadyGone => Ok(StatusCode::NO_CONTENT),
    }
}

/// DELETE /versions/entry?entryID=
///
/// Internal: called by the entry service when an entry is removed.
pub async fn delete_entry_versions(
    _caller: InternalCaller,
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<EntryParams>,
) -> AppResult<StatusCode> {
    let entry_id = params
        .entry_id
        .filter(|e| !e.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest("Missing entryID parameter".into()))?;

    let deleted = state.orchestrator.delete_by_entry(&entry_id).await?;
    tracing::info!(entry_id = %entry_id, deleted, "Entry versions removed");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /versions/{id}/translate?targetLang=
///
/// Returns the version either way; an already translated language is not
/// sent to the backend again.
pub async fn translate_version(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiQuery(params): ApiQuery<TranslateParams>,
) -> AppResult<impl IntoResponse> {
    let id = parse_version_id(&id)?;
    let outcome = state
        .translator
        .translate(id, params.target_lang.as_deref())
        .await?;

    Ok(Json(DataResponse {
        data: outcome.into_version(),
    }))
}
