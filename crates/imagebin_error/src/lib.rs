//! Error types for imagebin.
//!
//! This crate provides the error types shared by every imagebin crate.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All errors use `#[track_caller]` for automatic location capture
//!
//! [`ImagebinError`] aggregates every family and knows which HTTP status
//! and client-facing message each one maps to.
//!
//! # Examples
//!
//! ```
//! use imagebin_error::{ImagebinResult, ValidationError};
//!
//! fn check(name: &str) -> ImagebinResult<()> {
//!     if name.is_empty() {
//!         Err(ValidationError::new("No file provided"))?
//!     }
//!     Ok(())
//! }
//!
//! let err = check("").unwrap_err();
//! assert_eq!(err.status_code(), 400);
//! assert_eq!(err.public_message(), "No file provided");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod access;
mod config;
mod database;
mod error;
mod not_found;
mod storage;
mod validation;

pub use access::{AccessError, AccessErrorKind};
pub use config::ConfigError;
pub use database::{DatabaseError, DatabaseErrorKind};
pub use error::{ImagebinError, ImagebinErrorKind, ImagebinResult};
pub use not_found::NotFoundError;
pub use storage::{StorageError, StorageErrorKind};
pub use validation::ValidationError;
