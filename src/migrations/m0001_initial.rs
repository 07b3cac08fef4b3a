use cetane::prelude::*;

pub fn migration() -> Migration {
    Migration::new("0001_initial_schema").operation(RunSql::portable().for_backend(
        "sqlite",
        r#"CREATE TABLE file_records (
    id INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
    filename TEXT NOT NULL,
    file_hash TEXT NOT NULL UNIQUE,
    file_content BLOB NOT NULL,
    json_data TEXT NOT NULL,
    file_type TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT
)"#,
    ))
}
