//! Core domain types for imagebin.
//!
//! This crate defines the persisted [`ImageRecord`], the set of accepted
//! upload extensions, and the random token generator used for both the
//! on-disk name and the public filename of every image.
//!
//! # Example
//!
//! ```
//! use imagebin_core::{ImageExtension, ImageRecordBuilder, StoredFile, public_filename, stored_name};
//!
//! let ext = ImageExtension::from_filename("cat.PNG").unwrap();
//! let record = ImageRecordBuilder::default()
//!     .public_filename(public_filename(ext))
//!     .stored_file(StoredFile::new(stored_name(ext), "image/png", 1024))
//!     .build()
//!     .unwrap();
//!
//! assert!(record.public_filename().ends_with(".png"));
//! assert_ne!(record.public_filename(), record.stored_file().stored_name());
//! assert_eq!(record.public_path(), format!("/image/{}", record.public_filename()));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod extension;
mod record;
mod token;

pub use extension::ImageExtension;
pub use record::{ImageRecord, ImageRecordBuilder, ImageRecordBuilderError, StoredFile};
pub use token::{
    PUBLIC_NAME_BYTES, STORED_NAME_BYTES, generate_token, public_filename, stored_name,
};

/// Route prefix under which images are served.
pub const IMAGE_ROUTE_PREFIX: &str = "/image/";
