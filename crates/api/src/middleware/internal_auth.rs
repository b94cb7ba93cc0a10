//! Shared-secret authentication for service-to-service endpoints.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use lawiki_clients::INTERNAL_AUTH_HEADER;
use lawiki_core::error::CoreError;

use crate::error::AppError;
use crate::state::AppState;

/// Marker extractor: the request carried the shared internal secret.
///
/// ```ignore
/// async fn internal_only(_caller: InternalCaller) -> AppResult<StatusCode> { ... }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct InternalCaller;

impl FromRequestParts<AppState> for InternalCaller {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let provided = parts
            .headers
            .get(INTERNAL_AUTH_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(format!(
                    "Missing {INTERNAL_AUTH_HEADER} header"
                )))
            })?;

        if !secrets_match(provided, &state.config.services.internal_secret) {
            tracing::warn!("Rejected internal call with invalid secret");
            return Err(AppError::Core(CoreError::Unauthorized(
                "Invalid internal credentials".into(),
            )));
        }

        Ok(InternalCaller)
    }
}

/// Compares every byte so timing does not reveal the mismatch position.
fn secrets_match(provided: &str, expected: &str) -> bool {
    if expected.is_empty() || provided.len() != expected.len() {
        return false;
    }
    provided
        .bytes()
        .zip(expected.bytes())
        .fold(0u8, |acc, (a, b)| acc | (a ^ b))
        == 0
}
