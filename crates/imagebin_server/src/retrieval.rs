//! Retrieval handler.

use crate::{ApiError, AppState};
use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::HeaderValue;
use axum::http::header::CONTENT_TYPE;
use axum::response::{IntoResponse, Response};
use imagebin_error::NotFoundError;
use tracing::{debug, instrument, warn};

/// Stream an image by its public filename.
///
/// A record whose backing file is gone answers 404, the same as a missing record.
#[instrument(skip(state))]
pub(crate) async fn serve_image(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Response, ApiError> {
    let record = state
        .repository()
        .find_by_public_filename(&filename)
        .await?
        .ok_or_else(|| NotFoundError::new("Image not found"))?;

    let stored = record.stored_file();
    if !state.storage().exists(stored.stored_name()).await? {
        warn!(public_filename = %filename, "Record exists but its file is missing");
        return Err(NotFoundError::new("Image not found").into());
    }

    let stream = state.storage().read(stored.stored_name()).await?;
    let content_type = HeaderValue::from_str(stored.mime_type())
        .unwrap_or_else(|_| HeaderValue::from_static("application/octet-stream"));

    debug!(public_filename = %filename, mime_type = %stored.mime_type(), "Serving image");
    Ok(([(CONTENT_TYPE, content_type)], Body::from_stream(stream)).into_response())
}
