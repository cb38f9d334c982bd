//! JSON response envelope and API errors.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use imagebin_error::{
    AccessError, DatabaseError, ImagebinError, NotFoundError, StorageError, ValidationError,
};
use serde::{Deserialize, Serialize};

/// Outcome marker in the envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    /// 2xx responses
    Success,
    /// Everything else
    Error,
}

/// Envelope wrapping every JSON response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    /// `success` or `error`
    pub status: ResponseStatus,
    /// HTTP status code, repeated in the body
    pub status_code: u16,
    /// Human-readable message
    pub message: String,
    /// Payload, omitted when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    /// Build an envelope for `status`, deriving the outcome marker from it.
    pub fn new(status: StatusCode, message: impl Into<String>, data: Option<T>) -> Self {
        Self {
            status: if status.is_success() {
                ResponseStatus::Success
            } else {
                ResponseStatus::Error
            },
            status_code: status.as_u16(),
            message: message.into(),
            data,
        }
    }

    /// 200 envelope carrying `data`.
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self::new(StatusCode::OK, message, Some(data))
    }
}

impl ApiResponse<()> {
    /// Envelope with no payload.
    pub fn message(status: StatusCode, message: impl Into<String>) -> Self {
        Self::new(status, message, None)
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::OK);
        (status, Json(self)).into_response()
    }
}

/// Payload of a successful upload.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UploadData {
    /// Public path serving the image, `/image/<publicFilename>`
    pub path: String,
}

/// Error returned from handlers, rendered as an error envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    /// Create an error with an explicit status and client-facing message.
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// 500 with a specific client-facing message.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    /// Status code of the response.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Client-facing message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<ImagebinError> for ApiError {
    fn from(err: ImagebinError) -> Self {
        if err.is_server_error() {
            tracing::error!(error = %err, "Request failed");
        } else {
            tracing::debug!(error = %err, "Request rejected");
        }

        let status =
            StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        Self::new(status, err.public_message())
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ImagebinError::from(err).into()
    }
}

impl From<NotFoundError> for ApiError {
    fn from(err: NotFoundError) -> Self {
        ImagebinError::from(err).into()
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        ImagebinError::from(err).into()
    }
}

impl From<DatabaseError> for ApiError {
    fn from(err: DatabaseError) -> Self {
        ImagebinError::from(err).into()
    }
}

impl From<AccessError> for ApiError {
    fn from(err: AccessError) -> Self {
        ImagebinError::from(err).into()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        ApiResponse::message(self.status, self.message).into_response()
    }
}
