//! Binary asset storage for imagebin.
//!
//! The asset store owns the upload directory: no other component touches the
//! filesystem. Files are addressed by their stored name, a flat filename
//! directly under the upload root.
//!
//! # Example
//!
//! ```rust
//! use futures::TryStreamExt;
//! use imagebin_storage::{AssetStore, FileSystemStorage};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let storage = FileSystemStorage::new("/tmp/imagebin-upload");
//! storage.ensure_directory().await?;
//!
//! storage.write("abc.png", b"\x89PNG").await?;
//! let data: Vec<u8> = storage.read("abc.png").await?.try_concat().await?;
//! assert_eq!(data, b"\x89PNG");
//!
//! storage.delete("abc.png").await?;
//! assert!(!storage.exists("abc.png").await?);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod filesystem;
mod store;

pub use filesystem::FileSystemStorage;
pub use imagebin_error::{StorageError, StorageErrorKind};
pub use store::{AssetStore, ByteStream};
