//! Repository layer for database persistence.
//!
//! All database access uses Diesel ORM with compile-time query checking
//! against a SQLite database.

pub mod context;
pub mod file_records;
pub mod migrations;
pub mod models;
pub mod pool;
pub mod store;
pub mod util;

pub use context::DbContext;
pub use file_records::DieselFileRecordRepository;
pub use pool::{DbError, DbPool};
pub use store::{FileStore, StoreError};

use chrono::{DateTime, Utc};

/// Parse a datetime string from the database, defaulting to Unix epoch on error.
pub fn parse_datetime(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or(DateTime::UNIX_EPOCH)
}

/// Parse an optional datetime string from the database.
pub fn parse_datetime_opt(s: Option<String>) -> Option<DateTime<Utc>> {
    s.and_then(|s| {
        DateTime::parse_from_rfc3339(&s)
            .map(|dt| dt.with_timezone(&Utc))
            .ok()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_datetime() {
        let dt = parse_datetime("2024-03-01T12:30:00.000001Z");
        assert_eq!(dt.to_rfc3339(), "2024-03-01T12:30:00.000001+00:00");
        assert_eq!(parse_datetime("garbage"), DateTime::UNIX_EPOCH);
        assert!(parse_datetime_opt(None).is_none());
        assert!(parse_datetime_opt(Some("garbage".to_string())).is_none());
    }
}
