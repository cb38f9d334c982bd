//! Metadata repository trait definition.

use async_trait::async_trait;
use imagebin_core::ImageRecord;
use imagebin_error::ImagebinResult;

/// Persistence for image records, keyed by public filename.
///
/// There is deliberately no update operation: records are immutable, and a
/// replacement is a delete followed by a new upload.
#[async_trait]
pub trait MetadataRepository: Send + Sync {
    /// Insert a record and return it as stored.
    ///
    /// # Errors
    ///
    /// Returns a database error if the backend rejects the insert.
    async fn create(&self, record: &ImageRecord) -> ImagebinResult<ImageRecord>;

    /// Look up a record by its public filename.
    ///
    /// # Returns
    ///
    /// `Some(record)` if found, `None` otherwise
    async fn find_by_public_filename(
        &self,
        public_filename: &str,
    ) -> ImagebinResult<Option<ImageRecord>>;

    /// Delete every record with the given public filename.
    ///
    /// # Returns
    ///
    /// The number of records removed
    async fn delete_by_public_filename(&self, public_filename: &str) -> ImagebinResult<usize>;
}
