//! Diesel row types for image records.

use crate::schema::images;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use imagebin_core::{ImageRecord, ImageRecordBuilder, StoredFile};
use imagebin_error::{DatabaseError, DatabaseErrorKind};
use uuid::Uuid;

/// One row of the `images` table.
///
/// The stored file is flattened into columns.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Insertable)]
#[diesel(table_name = images)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ImageRow {
    /// Internal identifier
    pub id: Uuid,
    /// Reserved owner identifier
    pub owner_id: String,
    /// Public handle
    pub public_filename: String,
    /// Filename under the upload directory
    pub stored_name: String,
    /// Declared content type
    pub mime_type: String,
    /// Upload size in bytes
    pub size_bytes: i64,
    /// Creation time
    pub uploaded_at: DateTime<Utc>,
}

impl From<&ImageRecord> for ImageRow {
    fn from(record: &ImageRecord) -> Self {
        Self {
            id: *record.id(),
            owner_id: record.owner_id().clone(),
            public_filename: record.public_filename().clone(),
            stored_name: record.stored_file().stored_name().clone(),
            mime_type: record.stored_file().mime_type().clone(),
            size_bytes: *record.stored_file().size_bytes(),
            uploaded_at: *record.uploaded_at(),
        }
    }
}

impl TryFrom<ImageRow> for ImageRecord {
    type Error = DatabaseError;

    fn try_from(row: ImageRow) -> Result<Self, Self::Error> {
        ImageRecordBuilder::default()
            .id(row.id)
            .owner_id(row.owner_id)
            .public_filename(row.public_filename)
            .stored_file(StoredFile::new(row.stored_name, row.mime_type, row.size_bytes))
            .uploaded_at(row.uploaded_at)
            .build()
            .map_err(|e| DatabaseError::new(DatabaseErrorKind::Query(e.to_string())))
    }
}
