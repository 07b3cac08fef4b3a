//! SQLite connection factory.
//!
//! Uses diesel-async's SyncConnectionWrapper to provide an async interface
//! for SQLite. Since SQLite connections are lightweight, we create new
//! connections per request rather than pooling.


use diesel::sqlite::SqliteConnection;
use diesel_async::sync_connection_wrapper::SyncConnectionWrapper;
use diesel_async::{AsyncConnection, SimpleAsyncConnection};

use super::util::{is_postgres_url, to_diesel_error};

/// Diesel error type alias.
pub type DbError = diesel::result::Error;

/// Async SQLite connection type.
pub type SqliteConn = SyncConnectionWrapper<SqliteConnection>;

/// How long a connection waits on a locked database before failing.
const BUSY_TIMEOUT_MS: u32 = 5_000;

/// SQLite connection pool (lightweight - creates connections on demand).
#[derive(Clone, Debug)]
pub struct DbPool {
    database_url: String,
}

impl DbPool {
    /// Create a pool from a database URL.
    ///
    /// Accepts plain file paths and `sqlite:` URLs. PostgreSQL URLs are rejected.
    pub fn from_url(url: &str) -> Result<Self, DbError> {
        if is_postgres_url(url) {
            return Err(to_diesel_error(
                "PostgreSQL is not supported; use a sqlite: URL or a file path",
            ));
        }

        // Strip sqlite: prefix if present
        let url = url.strip_prefix("sqlite:").unwrap_or(url);
        Ok(Self {
            database_url: url.to_string(),
        })
    }

    /// Get a connection with the busy timeout applied.
    pub async fn get(&self) -> Result<SqliteConn, DbError> {
        let mut conn = SqliteConn::establish(&self.database_url)
            .await
            .map_err(to_diesel_error)?;
        conn.batch_execute(&format!("PRAGMA busy_timeout = {};", BUSY_TIMEOUT_MS))
            .await?;
        Ok(conn)
    }

    /// Get the database path (without the `sqlite:` prefix).
    pub fn database_url(&self) -> &str {
        &self.database_url
    }
}

/// Macro for running database operations on a fresh connection.
///
/// # Example
/// ```ignore
/// with_conn!(self.pool, conn => {
///     file_records::table.load::<FileRecordRow>(&mut conn).await
/// })
/// ```
#[macro_export]
macro_rules! with_conn {
    ($pool:expr, $conn:ident => $body:expr) => {{
        let mut $conn = $pool.get().await?;
        $body
    }};
}

pub use with_conn;
