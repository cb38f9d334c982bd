//! Persisted image metadata.

use chrono::{DateTime, Utc};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::IMAGE_ROUTE_PREFIX;

/// The binary backing an image, as it lives on disk.
///
/// `stored_name` is internal only and must never appear in a response.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Getters, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredFile {
    /// Filename under the upload directory
    stored_name: String,
    /// Content type declared at upload time
    mime_type: String,
    /// Size of the upload in bytes
    size_bytes: i64,
}

impl StoredFile {
    /// Create a stored file description.
    pub fn new(
        stored_name: impl Into<String>,
        mime_type: impl Into<String>,
        size_bytes: i64,
    ) -> Self {
        Self {
            stored_name: stored_name.into(),
            mime_type: mime_type.into(),
            size_bytes,
        }
    }
}

/// Metadata record for one uploaded image.
///
/// Records are immutable once created. `id`, `owner_id` and `uploaded_at`
/// default to a fresh UUID, an empty owner and the current time.
#[derive(
    Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize, derive_builder::Builder,
)]
#[builder(setter(into))]
#[serde(rename_all = "camelCase")]
pub struct ImageRecord {
    /// Internal identifier
    #[builder(default = "Uuid::new_v4()")]
    id: Uuid,
    /// Reserved for multi-tenancy; unused
    #[builder(default)]
    #[serde(default)]
    owner_id: String,
    /// External handle, used in the public URL
    public_filename: String,
    /// Backing file on disk
    stored_file: StoredFile,
    /// Creation time
    #[builder(default = "Utc::now()")]
    uploaded_at: DateTime<Utc>,
}

impl ImageRecord {
    /// Public URL path that serves this image.
    pub fn public_path(&self) -> String {
        format!("{}{}", IMAGE_ROUTE_PREFIX, self.public_filename)
    }
}
