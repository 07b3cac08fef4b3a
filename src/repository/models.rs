//! Diesel ORM models for the `file_records` table.

use diesel::prelude::*;

use crate::schema;

/// File record row from the database.
#[derive(Queryable, Selectable, Identifiable, Debug, Clone)]
#[diesel(table_name = schema::file_records)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct FileRecordRow {
    pub id: i32,
    pub filename: String,
    pub file_hash: String,
    pub file_content: Vec<u8>,
    pub json_data: String,
    pub file_type: String,
    pub created_at: String,
    pub updated_at: Option<String>,
}

/// Listing row: everything except content and payload.
#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = schema::file_records)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct FileSummaryRow {
    pub id: i32,
    pub filename: String,
    pub file_type: String,
    pub created_at: String,
    pub updated_at: Option<String>,
}

/// New file record for insertion.
#[derive(Insertable, Debug)]
#[diesel(table_name = schema::file_records)]
pub struct NewFileRecordRow<'a> {
    pub filename: &'a str,
    pub file_hash: &'a str,
    pub file_content: &'a [u8],
    pub json_data: &'a str,
    pub file_type: &'a str,
    pub created_at: &'a str,
    pub updated_at: Option<&'a str>,
}
