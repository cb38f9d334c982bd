//! Filesystem-based asset storage implementation.
//!
//! Files live flat under a single upload root:
//!
//! ```text
//! ./upload/
//! ├── 3q2-7wE...Xk.png
//! ├── Zx0_pQ...aa.jpeg
//! └── mM9k1L...0w.webp
//! ```

use crate::{AssetStore, ByteStream};
use futures::StreamExt;
use imagebin_error::{ImagebinResult, StorageError, StorageErrorKind};
use std::path::{Component, Path, PathBuf};
use tokio::io::AsyncReadExt;

/// Read buffer size for streamed responses.
const CHUNK_SIZE: usize = 64 * 1024;

/// Filesystem storage backend.
///
/// # Features
///
/// - **Lazy root creation**: the upload directory is created on first write
/// - **Atomic writes**: data goes to a hidden temp file, is synced, then renamed
/// - **Confirmed writes**: presence is checked after the rename
/// - **Confinement**: names that would leave the upload root are rejected
#[derive(Debug, Clone)]
pub struct FileSystemStorage {
    base_path: PathBuf,
}

impl FileSystemStorage {
    /// Create a new filesystem storage backend rooted at `base_path`.
    ///
    /// Nothing is touched on disk until [`AssetStore::ensure_directory`].
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    /// Resolve a stored name to its path, refusing anything but a plain filename.
    fn get_path(&self, stored_name: &str) -> ImagebinResult<PathBuf> {
        let mut components = Path::new(stored_name).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) => Ok(self.base_path.join(stored_name)),
            _ => Err(
                StorageError::new(StorageErrorKind::InvalidPath(stored_name.to_string())).into(),
            ),
        }
    }
}

/// Write `data` to `path` and flush it to disk.
///
/// `tokio::fs::write` runs the whole write on the blocking pool, so a short
/// write (disk full, I/O error) comes back as an error here.
async fn write_synced(path: &Path, data: &[u8]) -> std::io::Result<()> {
    tokio::fs::write(path, data).await?;
    let file = tokio::fs::OpenOptions::new().write(true).open(path).await?;
    file.sync_all().await
}

async fn remove_temp(path: &Path) {
    if let Err(e) = tokio::fs::remove_file(path).await {
        if e.kind() != std::io::ErrorKind::NotFound {
            tracing::warn!(path = %path.display(), error = %e, "Failed to remove temp file");
        }
    }
}

#[async_trait::async_trait]
impl AssetStore for FileSystemStorage {
    #[tracing::instrument(skip(self), fields(path = %self.base_path.display()))]
    async fn ensure_directory(&self) -> ImagebinResult<()> {
        tokio::fs::create_dir_all(&self.base_path).await.map_err(|e| {
            StorageError::new(StorageErrorKind::DirectoryCreation(format!(
                "{}: {}",
                self.base_path.display(),
                e
            )))
        })?;
        Ok(())
    }

    #[tracing::instrument(skip(self, data), fields(size = data.len()))]
    async fn write(&self, stored_name: &str, data: &[u8]) -> ImagebinResult<()> {
        let path = self.get_path(stored_name)?;
        let temp_path = self.base_path.join(format!(".{}.tmp", stored_name));

        let write_err = |e: std::io::Error| {
            StorageError::new(StorageErrorKind::FileWrite(format!(
                "{}: {}",
                temp_path.display(),
                e
            )))
        };

        // Write to temp file first, then rename for atomicity
        if let Err(e) = write_synced(&temp_path, data).await {
            remove_temp(&temp_path).await;
            return Err(write_err(e).into());
        }

        if let Err(e) = tokio::fs::rename(&temp_path, &path).await {
            remove_temp(&temp_path).await;
            return Err(StorageError::new(StorageErrorKind::FileWrite(format!(
                "rename {} to {}: {}",
                temp_path.display(),
                path.display(),
                e
            )))
            .into());
        }

        if !tokio::fs::try_exists(&path).await.unwrap_or(false) {
            return Err(StorageError::new(StorageErrorKind::WriteNotConfirmed(
                path.display().to_string(),
            ))
            .into());
        }

        tracing::info!(path = %path.display(), size = data.len(), "Stored image file");
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn read(&self, stored_name: &str) -> ImagebinResult<ByteStream> {
        let path = self.get_path(stored_name)?;

        let file = tokio::fs::File::open(&path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                StorageError::new(StorageErrorKind::NotFound(stored_name.to_string()))
            } else {
                StorageError::new(StorageErrorKind::FileRead(format!(
                    "{}: {}",
                    path.display(),
                    e
                )))
            }
        })?;

        tracing::debug!(path = %path.display(), "Opened image file");

        let stream = futures::stream::try_unfold(file, |mut file| async move {
            let mut buf = vec![0u8; CHUNK_SIZE];
            let n = file.read(&mut buf).await?;
            if n == 0 {
                return Ok::<_, std::io::Error>(None);
            }
            buf.truncate(n);
            Ok(Some((buf, file)))
        });

        Ok(stream.boxed())
    }

    #[tracing::instrument(skip(self))]
    async fn exists(&self, stored_name: &str) -> ImagebinResult<bool> {
        let path = self.get_path(stored_name)?;
        tokio::fs::try_exists(&path).await.map_err(|e| {
            StorageError::new(StorageErrorKind::FileRead(format!(
                "{}: {}",
                path.display(),
                e
            )))
            .into()
        })
    }

    #[tracing::instrument(skip(self))]
    async fn delete(&self, stored_name: &str) -> ImagebinResult<()> {
        let path = self.get_path(stored_name)?;

        tokio::fs::remove_file(&path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                StorageError::new(StorageErrorKind::NotFound(stored_name.to_string()))
            } else {
                StorageError::new(StorageErrorKind::FileDelete(format!(
                    "{}: {}",
                    path.display(),
                    e
                )))
            }
        })?;

        tracing::info!(path = %path.display(), "Deleted image file");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_path_accepts_plain_names() {
        let storage = FileSystemStorage::new("/srv/upload");
        let path = storage.get_path("abc-_.png").unwrap();
        assert_eq!(path, PathBuf::from("/srv/upload/abc-_.png"));
    }

    #[test]
    fn test_get_path_rejects_traversal() {
        let storage = FileSystemStorage::new("/srv/upload");
        for name in ["../etc/passwd", "a/b.png", "/abs.png", "..", ".", ""] {
            assert!(storage.get_path(name).is_err(), "{name}");
        }
    }
}
