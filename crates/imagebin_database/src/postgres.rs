//! PostgreSQL implementation of the metadata repository.

use crate::schema::images;
use crate::{DbPool, ImageRow, MetadataRepository};
use async_trait::async_trait;
use diesel::prelude::*;
use imagebin_core::ImageRecord;
use imagebin_error::{DatabaseError, DatabaseErrorKind, ImagebinResult};

/// Database-backed image repository.
///
/// Diesel is synchronous, so every query runs on the blocking thread pool
/// with a connection checked out of the shared pool.
#[derive(Clone)]
pub struct PostgresImageRepository {
    pool: DbPool,
}

impl PostgresImageRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn with_conn<T, F>(&self, f: F) -> ImagebinResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut PgConnection) -> Result<T, DatabaseError> + Send + 'static,
    {
        let pool = self.pool.clone();

        let result = tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;
            f(&mut conn)
        })
        .await
        .map_err(|e| DatabaseError::new(DatabaseErrorKind::Query(e.to_string())))?;

        Ok(result?)
    }
}

#[async_trait]
impl MetadataRepository for PostgresImageRepository {
    #[tracing::instrument(skip(self, record), fields(public_filename = %record.public_filename()))]
    async fn create(&self, record: &ImageRecord) -> ImagebinResult<ImageRecord> {
        let row = ImageRow::from(record);

        let inserted = self
            .with_conn(move |conn| {
                diesel::insert_into(images::table)
                    .values(&row)
                    .returning(ImageRow::as_returning())
                    .get_result(conn)
                    .map_err(DatabaseError::from)
            })
            .await?;

        tracing::info!(id = %inserted.id, "Created image record");
        Ok(ImageRecord::try_from(inserted)?)
    }

    #[tracing::instrument(skip(self))]
    async fn find_by_public_filename(
        &self,
        public_filename: &str,
    ) -> ImagebinResult<Option<ImageRecord>> {
        let name = public_filename.to_string();

        let row = self
            .with_conn(move |conn| {
                images::table
                    .filter(images::public_filename.eq(&name))
                    .select(ImageRow::as_select())
                    .first(conn)
                    .optional()
                    .map_err(DatabaseError::from)
            })
            .await?;

        tracing::debug!(found = row.is_some(), "Looked up image record");
        Ok(row.map(ImageRecord::try_from).transpose()?)
    }

    #[tracing::instrument(skip(self))]
    async fn delete_by_public_filename(&self, public_filename: &str) -> ImagebinResult<usize> {
        let name = public_filename.to_string();

        let deleted = self
            .with_conn(move |conn| {
                diesel::delete(images::table.filter(images::public_filename.eq(&name)))
                    .execute(conn)
                    .map_err(DatabaseError::from)
            })
            .await?;

        tracing::info!(deleted, "Deleted image records");
        Ok(deleted)
    }
}
