//! Asset store trait definition.

use futures::stream::BoxStream;
use imagebin_error::ImagebinResult;

/// Stream of file contents in chunks.
pub type ByteStream = BoxStream<'static, std::io::Result<Vec<u8>>>;

/// Trait for binary asset backends.
///
/// Implementations store opaque bytes under a caller-chosen name. Metadata
/// lives elsewhere; the store knows nothing about public filenames.
#[async_trait::async_trait]
pub trait AssetStore: Send + Sync {
    /// Create the storage root if it does not exist yet.
    ///
    /// Idempotent; called before every write.
    async fn ensure_directory(&self) -> ImagebinResult<()>;

    /// Durably write `data` under `stored_name`.
    ///
    /// # Errors
    ///
    /// Fails with a storage error if the write cannot complete or the file
    /// cannot be confirmed present afterwards.
    async fn write(&self, stored_name: &str, data: &[u8]) -> ImagebinResult<()>;

    /// Open `stored_name` for streaming.
    ///
    /// # Errors
    ///
    /// Fails with a not-found storage error when no such file exists.
    async fn read(&self, stored_name: &str) -> ImagebinResult<ByteStream>;

    /// Check whether `stored_name` is present.
    async fn exists(&self, stored_name: &str) -> ImagebinResult<bool>;

    /// Remove `stored_name`.
    ///
    /// # Errors
    ///
    /// Fails with a not-found storage error when the file is already gone,
    /// including when another deletion won a race.
    async fn delete(&self, stored_name: &str) -> ImagebinResult<()>;
}
