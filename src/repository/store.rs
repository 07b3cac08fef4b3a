//! Persistence contract used by the ingestion pipeline.

use async_trait::async_trait;
use thiserror::Error;

use super::pool::DbError;
use crate::models::{FileRecord, FileSummary, Fingerprint, NewFileRecord};

/// Errors from the record store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Another writer stored the same content first.
    #[error("A record with fingerprint {0} already exists")]
    DuplicateFingerprint(Fingerprint),

    #[error("Database error: {0}")]
    Database(#[from] DbError),
}

/// Storage for file records, keyed by content fingerprint.
#[async_trait]
pub trait FileStore: Send + Sync {
    /// Look up a record by content fingerprint.
    async fn find_by_fingerprint(
        &self,
        fingerprint: &Fingerprint,
    ) -> Result<Option<FileRecord>, StoreError>;

    /// Insert a new record.
    ///
    /// Fails with [`StoreError::DuplicateFingerprint`] if the fingerprint is
    /// already stored.
    async fn insert(&self, record: NewFileRecord) -> Result<FileRecord, StoreError>;

    /// All records, newest first, without content or payload.
    async fn list_all(&self) -> Result<Vec<FileSummary>, StoreError>;

    /// Look up a record by row ID.
    async fn find_by_id(&self, id: i64) -> Result<Option<FileRecord>, StoreError>;
}
