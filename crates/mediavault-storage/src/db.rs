//! SQLite connection handling.
//!
//! One `Connection` per `Database`, guarded by a Mutex; the repository
//! borrows it through [`Database::with_conn`] for the duration of each
//! statement. Opening a database also applies pragmas and brings the
//! schema up to date.

use std::path::Path;
use std::sync::Mutex;

use rusqlite::Connection;
use tracing::info;

use mediavault_core::error::VaultError;

use crate::migrations;

/// Shared handle to the media database.
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open the database file, creating it (and its parent directories)
    /// when missing. Sets WAL journaling with synchronous=NORMAL and runs
    /// pending migrations before returning.
    pub fn new(path: &Path) -> Result<Self, VaultError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)
            .map_err(|e| VaultError::Storage(format!("Failed to open database: {}", e)))?;

        let db = Self::from_connection(conn)?;
        info!("Database opened at {}", path.display());
        Ok(db)
    }

    /// Open a throwaway in-memory database. Test-only convenience; goes
    /// through the same pragma and migration path as [`Database::new`].
    pub fn in_memory() -> Result<Self, VaultError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| VaultError::Storage(format!("Failed to open in-memory db: {}", e)))?;

        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self, VaultError> {
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;",
        )
        .map_err(|e| VaultError::Storage(format!("Failed to set pragmas: {}", e)))?;

        let db = Self {
            conn: Mutex::new(conn),
        };
        db.with_conn(migrations::run_migrations)?;
        Ok(db)
    }

    /// Run a closure against the connection while holding the lock.
    ///
    /// A poisoned lock surfaces as a storage error rather than a panic.
    pub fn with_conn<F, T>(&self, f: F) -> Result<T, VaultError>
    where
        F: FnOnce(&Connection) -> Result<T, VaultError>,
    {
        let conn = self
            .conn
            .lock()
            .map_err(|e| VaultError::Storage(format!("Database lock poisoned: {}", e)))?;
        f(&conn)
    }
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database").finish()
    }
}
