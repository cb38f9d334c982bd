//! Upload handler.

use crate::{ApiError, ApiResponse, AppState, UPLOAD_FIELD, UploadData};
use axum::extract::multipart::{Field, MultipartError, MultipartRejection};
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use imagebin_core::{ImageExtension, ImageRecordBuilder, StoredFile, public_filename, stored_name};
use imagebin_error::ValidationError;
use tracing::{debug, error, info, instrument, warn};

/// A file part pulled out of the multipart body.
#[derive(Debug)]
struct UploadedFile {
    filename: String,
    content_type: Option<String>,
    bytes: Vec<u8>,
}

/// Accept one image, store its bytes and record its metadata.
#[instrument(skip_all)]
pub(crate) async fn upload_image(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<ApiResponse<UploadData>, ApiError> {
    let mut multipart = multipart.map_err(|rejection| {
        debug!(error = %rejection, "Request body is not multipart");
        ValidationError::new("No file provided")
    })?;

    let upload = read_image_field(&mut multipart)
        .await?
        .ok_or_else(|| ValidationError::new("No file provided"))?;

    let ext = ImageExtension::from_filename(&upload.filename)
        .ok_or_else(|| ValidationError::new("Invalid file extension"))?;

    let storage = state.storage();
    storage.ensure_directory().await?;

    let stored = stored_name(ext);
    storage.write(&stored, &upload.bytes).await?;

    let mime_type = upload
        .content_type
        .unwrap_or_else(|| ext.mime_type().to_string());
    let size_bytes = i64::try_from(upload.bytes.len()).unwrap_or(i64::MAX);

    let record = ImageRecordBuilder::default()
        .public_filename(public_filename(ext))
        .stored_file(StoredFile::new(stored.as_str(), mime_type, size_bytes))
        .build();

    let saved = match record {
        Ok(record) => state.repository().create(&record).await.map_err(|e| e.to_string()),
        Err(e) => Err(e.to_string()),
    };

    match saved {
        Ok(record) => {
            info!(
                public_filename = %record.public_filename(),
                size_bytes,
                "Image uploaded"
            );
            Ok(ApiResponse::ok(
                "Image uploaded successfully",
                UploadData {
                    path: record.public_path(),
                },
            ))
        }
        Err(cause) => {
            error!(error = %cause, "Failed to save image record");
            match storage.delete(&stored).await {
                Ok(()) => warn!("Removed stored file left without a record"),
                Err(e) => warn!(error = %e, "Could not remove stored file left without a record"),
            }
            Err(ApiError::internal("Could not save image"))
        }
    }
}

/// Read parts until the first named file in the upload field.
///
/// Other fields, and parts without a filename, are skipped.
async fn read_image_field(multipart: &mut Multipart) -> Result<Option<UploadedFile>, ApiError> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let Some(filename) = field.file_name().filter(|f| !f.is_empty()).map(str::to_owned) else {
            continue;
        };
        return read_file(field, filename).await.map(Some);
    }
    Ok(None)
}

async fn read_file(field: Field<'_>, filename: String) -> Result<UploadedFile, ApiError> {
    let content_type = field
        .content_type()
        .filter(|ct| !ct.is_empty())
        .map(str::to_owned);
    let bytes = field.bytes().await.map_err(multipart_error)?;

    debug!(%filename, size = bytes.len(), "Received upload");
    Ok(UploadedFile {
        filename,
        content_type,
        bytes: bytes.to_vec(),
    })
}

fn multipart_error(err: MultipartError) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        debug!(error = %err, "Upload exceeds body limit");
        ApiError::new(StatusCode::PAYLOAD_TOO_LARGE, "File too large")
    } else {
        debug!(error = %err, "Malformed multipart body");
        ApiError::new(StatusCode::BAD_REQUEST, "Malformed upload")
    }
}
