//! Deletion handler.

use crate::{ApiError, ApiResponse, AppState};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use imagebin_error::{ImagebinErrorKind, NotFoundError};
use tracing::{info, instrument, warn};

/// Delete an image's file, then its record.
///
/// The file goes first: a failure between the two steps leaves a record
/// pointing at nothing, which retrieval already treats as not found.
#[instrument(skip(state))]
pub(crate) async fn delete_image(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<ApiResponse<()>, ApiError> {
    let repository = state.repository();
    let record = repository
        .find_by_public_filename(&filename)
        .await?
        .ok_or_else(|| NotFoundError::new("Image not found"))?;

    match state
        .storage()
        .delete(record.stored_file().stored_name())
        .await
    {
        Ok(()) => {}
        Err(e) if matches!(e.kind(), ImagebinErrorKind::Storage(s) if s.is_not_found()) => {
            warn!(public_filename = %filename, "Backing file already gone");
        }
        Err(e) => return Err(e.into()),
    }

    if repository.delete_by_public_filename(&filename).await? == 0 {
        return Err(NotFoundError::new("Image not found").into());
    }

    info!(public_filename = %filename, "Image deleted");
    Ok(ApiResponse::message(
        StatusCode::OK,
        "Image deleted successfully",
    ))
}
