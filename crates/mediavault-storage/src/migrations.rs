//! Database schema migrations.
//!
//! Applies the initial schema: the `media_files` table and the
//! `schema_migrations` tracking table.

use rusqlite::Connection;
use tracing::info;

use mediavault_core::error::VaultError;

/// Run all pending database migrations.
///
/// Currently implements the initial schema (version 1). Future migrations
/// can be added by checking the current version and applying incremental changes.
pub fn run_migrations(conn: &Connection) -> Result<(), VaultError> {
    // Create the migrations tracking table first.
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version     INTEGER PRIMARY KEY NOT NULL,
            name        TEXT NOT NULL,
            applied_at  INTEGER NOT NULL DEFAULT (strftime('%s', 'now'))
        );",
    )
    .map_err(|e| VaultError::Storage(format!("Failed to create migrations table: {}", e)))?;

    let current_version: i64 = conn
        .query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
            [],
            |row| row.get(0),
        )
        .map_err(|e| VaultError::Storage(format!("Failed to query migration version: {}", e)))?;

    if current_version < 1 {
        apply_v1(conn)?;
        info!("Applied migration v1: media_files");
    }

    Ok(())
}

/// Version 1: the media_files table.
fn apply_v1(conn: &Connection) -> Result<(), VaultError> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS media_files (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            file_id     TEXT NOT NULL,
            file_type   TEXT NOT NULL
                        CHECK (file_type IN ('photo', 'video', 'document', 'audio', 'animation')),
            user_id     INTEGER,
            meta_data   TEXT,
            created_at  INTEGER NOT NULL DEFAULT (strftime('%s', 'now'))
        );

        -- created_at drives both latest-record lookup and retention deletes.
        CREATE INDEX IF NOT EXISTS idx_media_files_created_at
            ON media_files (created_at DESC, id DESC);

        INSERT OR IGNORE INTO schema_migrations (version, name) VALUES (1, 'media_files');
        ",
    )
    .map_err(|e| VaultError::Storage(format!("Failed to apply migration v1: {}", e)))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_test_conn() -> Connection {
        Connection::open_in_memory().unwrap()
    }

    #[test]
    fn test_migrations_run_once() {
        let conn = open_test_conn();
        run_migrations(&conn).unwrap();

        // Running again should be idempotent.
        run_migrations(&conn).unwrap();

        let version: i64 = conn
            .query_row("SELECT MAX(version) FROM schema_migrations", [], |row| {
                row.get(0)
            })
            .unwrap();
        assert_eq!(version, 1);
    }

    #[test]
    fn test_media_files_table_exists() {
        let conn = open_test_conn();
        run_migrations(&conn).unwrap();

        conn.execute(
            "INSERT INTO media_files (file_id, file_type, user_id, meta_data)
             VALUES ('abc123', 'document', 42, '{\"mime_type\":\"application/pdf\"}')",
            [],
        )
        .unwrap();

        let file_id: String = conn
            .query_row(
                "SELECT file_id FROM media_files WHERE user_id = 42",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(file_id, "abc123");
    }

    #[test]
    fn test_created_at_defaults_to_now() {
        let conn = open_test_conn();
        run_migrations(&conn).unwrap();

        conn.execute(
            "INSERT INTO media_files (file_id, file_type) VALUES ('x', 'photo')",
            [],
        )
        .unwrap();

        let created_at: i64 = conn
            .query_row("SELECT created_at FROM media_files", [], |row| row.get(0))
            .unwrap();
        let now = chrono::Utc::now().timestamp();
        assert!((now - created_at).abs() < 5);
    }

    #[test]
    fn test_ids_autoincrement() {
        let conn = open_test_conn();
        run_migrations(&conn).unwrap();

        for _ in 0..3 {
            conn.execute(
                "INSERT INTO media_files (file_id, file_type) VALUES ('x', 'photo')",
                [],
            )
            .unwrap();
        }

        let max_id: i64 = conn
            .query_row("SELECT MAX(id) FROM media_files", [], |row| row.get(0))
            .unwrap();
        assert_eq!(max_id, 3);
    }

    #[test]
    fn test_file_type_check() {
        let conn = open_test_conn();
        run_migrations(&conn).unwrap();

        let result = conn.execute(
            "INSERT INTO media_files (file_id, file_type) VALUES ('x', 'sticker')",
            [],
        );
        assert!(result.is_err());
    }
}
