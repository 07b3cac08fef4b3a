use cetane::prelude::*;

pub fn migration() -> Migration {
    Migration::new("0002_file_records_indexes")
        .depends_on(&["0001_initial_schema"])
        .operation(RunSql::portable().for_backend(
            "sqlite",
            "CREATE UNIQUE INDEX IF NOT EXISTS idx_file_records_file_hash ON file_records(file_hash)",
        ))
        .operation(RunSql::portable().for_backend(
            "sqlite",
            "CREATE INDEX IF NOT EXISTS idx_file_records_filename ON file_records(filename)",
        ))
        .operation(RunSql::portable().for_backend(
            "sqlite",
            "CREATE INDEX IF NOT EXISTS idx_file_records_created_at ON file_records(created_at)",
        ))
}
