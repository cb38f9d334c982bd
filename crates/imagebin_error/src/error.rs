//! Top-level error wrapper types.

use crate::{
    AccessError, AccessErrorKind, ConfigError, DatabaseError, DatabaseErrorKind, NotFoundError,
    StorageError, ValidationError,
};

/// Generic message returned for every server-side failure.
const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Every error family imagebin can produce.
///
/// # Examples
///
/// ```
/// use imagebin_error::{ImagebinError, NotFoundError};
///
/// let err: ImagebinError = NotFoundError::new("Image not found").into();
/// assert!(format!("{}", err).contains("Not Found"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum ImagebinErrorKind {
    /// Missing or invalid client input
    #[from(ValidationError)]
    Validation(ValidationError),
    /// Requested resource is absent
    #[from(NotFoundError)]
    NotFound(NotFoundError),
    /// Asset store failure
    #[from(StorageError)]
    Storage(StorageError),
    /// Metadata repository failure
    #[from(DatabaseError)]
    Database(DatabaseError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Request rejected by the access gate or API key check
    #[from(AccessError)]
    Access(AccessError),
}

/// imagebin error with kind discrimination and HTTP status mapping.
///
/// # Examples
///
/// ```
/// use imagebin_error::{ImagebinError, StorageError, StorageErrorKind};
///
/// let err: ImagebinError = StorageError::new(StorageErrorKind::FileWrite("disk full".into())).into();
/// assert_eq!(err.status_code(), 500);
/// assert_eq!(err.public_message(), "Internal server error");
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("imagebin Error: {}", _0)]
pub struct ImagebinError(Box<ImagebinErrorKind>);

impl ImagebinError {
    /// Create a new error from a kind.
    pub fn new(kind: ImagebinErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &ImagebinErrorKind {
        &self.0
    }

    /// HTTP status code this error maps to.
    pub fn status_code(&self) -> u16 {
        match self.kind() {
            ImagebinErrorKind::Validation(_) => 400,
            ImagebinErrorKind::NotFound(_) => 404,
            ImagebinErrorKind::Storage(e) if e.is_not_found() => 404,
            ImagebinErrorKind::Storage(_) => 500,
            ImagebinErrorKind::Database(e) if e.kind == DatabaseErrorKind::NotFound => 404,
            ImagebinErrorKind::Database(_) => 500,
            ImagebinErrorKind::Config(_) => 500,
            ImagebinErrorKind::Access(e) => match e.kind {
                // 404 rather than 403 so disallowed origins learn nothing
                AccessErrorKind::OriginRejected(_) => 404,
                AccessErrorKind::MissingApiKey | AccessErrorKind::InvalidApiKey => 401,
            },
        }
    }

    /// Message safe to show a client.
    ///
    /// Server-side failures collapse to a generic message; details belong in
    /// the logs only.
    pub fn public_message(&self) -> String {
        match self.kind() {
            ImagebinErrorKind::Validation(e) => e.message.clone(),
            ImagebinErrorKind::NotFound(e) => e.message.clone(),
            ImagebinErrorKind::Storage(e) if e.is_not_found() => "Image not found".to_string(),
            ImagebinErrorKind::Database(e) if e.kind == DatabaseErrorKind::NotFound => {
                "Image not found".to_string()
            }
            ImagebinErrorKind::Access(e) => match e.kind {
                AccessErrorKind::OriginRejected(_) => "Endpoint not found".to_string(),
                AccessErrorKind::MissingApiKey | AccessErrorKind::InvalidApiKey => {
                    "Unauthorized".to_string()
                }
            },
            ImagebinErrorKind::Storage(_)
            | ImagebinErrorKind::Database(_)
            | ImagebinErrorKind::Config(_) => INTERNAL_ERROR_MESSAGE.to_string(),
        }
    }

    /// Whether the error is a server-side failure (5xx).
    pub fn is_server_error(&self) -> bool {
        self.status_code() >= 500
    }
}

// Generic From implementation for any type that converts to ImagebinErrorKind
impl<T> From<T> for ImagebinError
where
    T: Into<ImagebinErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for imagebin operations.
pub type ImagebinResult<T> = std::result::Result<T, ImagebinError>;
