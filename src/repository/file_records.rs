//! Diesel-based file record repository for SQLite.

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use super::models::{FileRecordRow, FileSummaryRow, NewFileRecordRow};
use super::pool::DbPool;
use super::store::{FileStore, StoreError};
use super::util::is_unique_violation;
use super::{parse_datetime, parse_datetime_opt};
use crate::models::{FileRecord, FileSummary, Fingerprint, NewFileRecord};
use crate::schema::file_records;
use crate::with_conn;

/// Convert a database record to a domain model.
impl From<FileRecordRow> for FileRecord {
    fn from(row: FileRecordRow) -> Self {
        FileRecord {
            id: i64::from(row.id),
            filename: row.filename,
            fingerprint: Fingerprint::from_hex(row.file_hash),
            raw_content: row.file_content,
            extracted_json: row.json_data,
            detected_type: row.file_type,
            created_at: parse_datetime(&row.created_at),
            updated_at: parse_datetime_opt(row.updated_at),
        }
    }
}

impl From<FileSummaryRow> for FileSummary {
    fn from(row: FileSummaryRow) -> Self {
        FileSummary {
            id: i64::from(row.id),
            filename: row.filename,
            file_type: row.file_type,
            created_at: parse_datetime(&row.created_at),
            updated_at: parse_datetime_opt(row.updated_at),
        }
    }
}

/// Diesel-based file record repository.
#[derive(Clone)]
pub struct DieselFileRecordRepository {
    pool: DbPool,
}

impl DieselFileRecordRepository {
    /// Create a new repository with an existing pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Count stored records.
    pub async fn count(&self) -> Result<i64, StoreError> {
        use diesel::dsl::count_star;

        with_conn!(self.pool, conn => {
            Ok(file_records::table
                .select(count_star())
                .first::<i64>(&mut conn)
                .await?)
        })
    }
}

#[async_trait]
impl FileStore for DieselFileRecordRepository {
    async fn find_by_fingerprint(
        &self,
        fingerprint: &Fingerprint,
    ) -> Result<Option<FileRecord>, StoreError> {
        with_conn!(self.pool, conn => {
            Ok(file_records::table
                .filter(file_records::file_hash.eq(fingerprint.as_str()))
                .select(FileRecordRow::as_select())
                .first::<FileRecordRow>(&mut conn)
                .await
                .optional()?
                .map(FileRecord::from))
        })
    }

    async fn insert(&self, record: NewFileRecord) -> Result<FileRecord, StoreError> {
        let created_at = Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true);
        let row = NewFileRecordRow {
            filename: &record.filename,
            file_hash: record.fingerprint.as_str(),
            file_content: &record.raw_content,
            json_data: &record.extracted_json,
            file_type: &record.detected_type,
            created_at: &created_at,
            updated_at: None,
        };

        with_conn!(self.pool, conn => {
            diesel::insert_into(file_records::table)
                .values(&row)
                .execute(&mut conn)
                .await
                .map_err(|e| {
                    if is_unique_violation(&e) {
                        StoreError::DuplicateFingerprint(record.fingerprint.clone())
                    } else {
                        StoreError::Database(e)
                    }
                })?;

            let stored = file_records::table
                .filter(file_records::file_hash.eq(record.fingerprint.as_str()))
                .select(FileRecordRow::as_select())
                .first::<FileRecordRow>(&mut conn)
                .await?;

            Ok(FileRecord::from(stored))
        })
    }

    async fn list_all(&self) -> Result<Vec<FileSummary>, StoreError> {
        with_conn!(self.pool, conn => {
            let rows = file_records::table
                .order((file_records::created_at.desc(), file_records::id.desc()))
                .select(FileSummaryRow::as_select())
                .load::<FileSummaryRow>(&mut conn)
                .await?;

            Ok(rows.into_iter().map(FileSummary::from).collect())
        })
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<FileRecord>, StoreError> {
        // Row IDs are 32-bit in SQLite's diesel mapping
        let Ok(id) = i32::try_from(id) else {
            return Ok(None);
        };

        with_conn!(self.pool, conn => {
            Ok(file_records::table
                .find(id)
                .select(FileRecordRow::as_select())
                .first::<FileRecordRow>(&mut conn)
                .await
                .optional()?
                .map(FileRecord::from))
        })
    }
}
