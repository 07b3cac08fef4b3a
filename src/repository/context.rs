//! Database context for managing connections and repository access.
//!
//! The DbContext is the primary entry point for all database operations.
//! It holds the connection pool and provides access to the repositories.

use std::sync::Arc;

use super::file_records::DieselFileRecordRepository;
use super::migrations::run_migrations;
use super::pool::{DbError, DbPool};
use super::store::FileStore;

/// Database context that manages the connection pool and provides repository access.
///
/// # Example
/// ```ignore
/// let ctx = DbContext::from_url("sqlite:/data/docingest.db")?;
/// ctx.migrate().await?;
/// let files = ctx.files().list_all().await?;
/// ```
#[derive(Clone, Debug)]
pub struct DbContext {
    pool: DbPool,
}

impl DbContext {
    /// Create a context from a database URL (`sqlite:` URL or file path).
    pub fn from_url(url: &str) -> Result<Self, DbError> {
        Ok(Self {
            pool: DbPool::from_url(url)?,
        })
    }

    /// Get a file record repository.
    pub fn files(&self) -> DieselFileRecordRepository {
        DieselFileRecordRepository::new(self.pool.clone())
    }

    /// Get the file record repository as a shareable store.
    pub fn file_store(&self) -> Arc<dyn FileStore> {
        Arc::new(self.files())
    }

    /// Apply pending schema migrations.
    pub async fn migrate(&self) -> Result<Vec<String>, DbError> {
        run_migrations(self.pool.database_url()).await
    }
}
