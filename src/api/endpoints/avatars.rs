//! Avatar download endpoint

use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};

use crate::api::error::ApiError;
use crate::api::types::AppContext;
use crate::core::avatars::{AVATAR_CACHE_CONTROL, AVATAR_CONTENT_TYPE};
use crate::domain::BlobId;

/// `GET /api/avatars/:id` - stored bytes with a one-year immutable cache
/// header
///
/// A malformed id, a missing blob and a failed read all answer 404.
pub async fn fetch(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let bytes = match BlobId::parse(&id) {
        Ok(blob_id) => ctx.records.avatars.download(&blob_id).await,
        Err(e) => Err(e),
    }
    .map_err(|e| {
        tracing::debug!(avatar_id = %id, error = %e, "Avatar lookup failed");
        ApiError::NotFound("Avatar not found".into())
    })?;

    Ok((
        [
            (header::CONTENT_TYPE, AVATAR_CONTENT_TYPE.to_string()),
            (header::CONTENT_LENGTH, bytes.len().to_string()),
            (header::CACHE_CONTROL, AVATAR_CACHE_CONTROL.to_string()),
        ],
        bytes,
    )
        .into_response())
}
