//! In-memory implementation of the metadata repository.

use crate::MetadataRepository;
use async_trait::async_trait;
use imagebin_core::ImageRecord;
use imagebin_error::ImagebinResult;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Process-local image repository.
///
/// Records vanish with the process; intended for tests and running the
/// server without a database.
#[derive(Debug, Clone, Default)]
pub struct InMemoryImageRepository {
    records: Arc<RwLock<Vec<ImageRecord>>>,
}

impl InMemoryImageRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    /// Whether no records are stored.
    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl MetadataRepository for InMemoryImageRepository {
    async fn create(&self, record: &ImageRecord) -> ImagebinResult<ImageRecord> {
        self.records.write().await.push(record.clone());
        Ok(record.clone())
    }

    async fn find_by_public_filename(
        &self,
        public_filename: &str,
    ) -> ImagebinResult<Option<ImageRecord>> {
        Ok(self
            .records
            .read()
            .await
            .iter()
            .find(|r| r.public_filename() == public_filename)
            .cloned())
    }

    async fn delete_by_public_filename(&self, public_filename: &str) -> ImagebinResult<usize> {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|r| r.public_filename() != public_filename);
        Ok(before - records.len())
    }
}
