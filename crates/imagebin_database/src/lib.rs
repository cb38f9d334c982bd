//! Image metadata persistence for imagebin.
//!
//! This crate provides the [`MetadataRepository`] abstraction over image
//! records and two implementations:
//!
//! - [`PostgresImageRepository`]: Diesel-based PostgreSQL storage over an r2d2 pool
//! - [`InMemoryImageRepository`]: process-local storage for tests and local runs
//!
//! # Example
//!
//! ```rust,ignore
//! use imagebin_database::{establish_pool, run_migrations, PostgresImageRepository};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = establish_pool("postgres://localhost/imagebin")?;
//! run_migrations(&pool)?;
//! let repo = PostgresImageRepository::new(pool);
//!
//! // Use repository...
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod connection;
mod memory;
mod models;
mod postgres;
mod repository;

// Public modules for external access
pub mod schema;

pub use connection::{DbPool, establish_pool, run_migrations};
pub use memory::InMemoryImageRepository;
pub use models::ImageRow;
pub use postgres::PostgresImageRepository;
pub use repository::MetadataRepository;

use imagebin_error::DatabaseError;

/// Result type for database operations.
pub type DatabaseResult<T> = Result<T, DatabaseError>;
