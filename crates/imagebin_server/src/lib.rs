//! HTTP server for imagebin.
//!
//! Clients upload an image, the server writes the bytes to the asset store,
//! records metadata in the repository, and answers with a stable public
//! path that serves or deletes the image.
//!
//! # Routes
//!
//! | Method | Path | Guard |
//! |---|---|---|
//! | GET | `/` | none |
//! | POST | `/api/v1/image` | origin allow-list + API key |
//! | DELETE | `/api/v1/image/:filename` | origin allow-list + API key |
//! | GET | `/image/:filename` | none |
//!
//! Every JSON response uses the [`ApiResponse`] envelope.
//!
//! # Example
//!
//! ```rust,no_run
//! use imagebin_database::InMemoryImageRepository;
//! use imagebin_server::{AppState, ServerConfigBuilder, create_router};
//! use imagebin_storage::FileSystemStorage;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ServerConfigBuilder::default()
//!         .api_key("change-me")
//!         .build()?;
//!     let storage = FileSystemStorage::new(config.upload_dir());
//!     let state = AppState::new(config, storage, InMemoryImageRepository::new());
//!
//!     let listener = tokio::net::TcpListener::bind("127.0.0.1:5000").await?;
//!     axum::serve(listener, create_router(state)).await?;
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod access;
mod config;
mod cors;
mod deletion;
mod logging;
mod observability;
mod response;
mod retrieval;
mod router;
mod state;
mod upload;

pub use config::{ServerConfig, ServerConfigBuilder, ServerConfigBuilderError};
pub use observability::init_tracing;
pub use response::{ApiError, ApiResponse, ResponseStatus, UploadData};
pub use router::create_router;
pub use state::AppState;

/// Multipart field carrying the uploaded file.
pub const UPLOAD_FIELD: &str = "image";
