//! Repository for the `media_files` table.
//!
//! Every operation is a single SQL statement; there are no multi-statement
//! transactions and no retries. Failures surface as `VaultError::Storage`
//! wrapping the driver message.

use std::sync::Arc;

use chrono::{NaiveDate, TimeZone, Utc};
use rusqlite::OptionalExtension;
use tracing::{debug, info};

use mediavault_core::error::VaultError;
use mediavault_core::types::{MediaKind, MediaMetadata, MediaRecord, NewMedia, StoreStats};

use crate::db::Database;

const SELECT_COLUMNS: &str = "id, file_id, file_type, user_id, meta_data, created_at";

/// Repository for media records.
pub struct MediaRepository {
    db: Arc<Database>,
}

impl MediaRepository {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Store a new media record and return its assigned id.
    ///
    /// Metadata is serialized to JSON, or stored as NULL when absent or
    /// empty. `created_at` is assigned by the database.
    pub fn save(&self, media: &NewMedia) -> Result<i64, VaultError> {
        if media.file_id.trim().is_empty() {
            return Err(VaultError::InvalidInput(
                "file_id must not be empty".to_string(),
            ));
        }

        let meta_text = match &media.metadata {
            Some(meta) if !meta.is_empty() => Some(serde_json::to_string(meta)?),
            _ => None,
        };

        self.db.with_conn(|conn| {
            conn.execute(
                "INSERT INTO media_files (file_id, file_type, user_id, meta_data)
                 VALUES (?1, ?2, ?3, ?4)",
                rusqlite::params![
                    media.file_id,
                    media.kind.as_str(),
                    media.user_id,
                    meta_text,
                ],
            )
            .map_err(|e| VaultError::Storage(format!("Failed to save media: {}", e)))?;

            let id = conn.last_insert_rowid();
            debug!(id, kind = %media.kind, "Media record saved");
            Ok(id)
        })
    }

    /// Return the most recently created record, or `None` if the store is
    /// empty. Equal timestamps tie-break on highest id (latest insert wins).
    pub fn latest(&self) -> Result<Option<MediaRecord>, VaultError> {
        self.db.with_conn(|conn| {
            let mut stmt = conn
                .prepare(&format!(
                    "SELECT {SELECT_COLUMNS} FROM media_files
                     ORDER BY created_at DESC, id DESC
                     LIMIT 1"
                ))
                .map_err(|e| VaultError::Storage(e.to_string()))?;

            let result = stmt
                .query_row([], |row| Ok(row_to_record(row)))
                .optional()
                .map_err(|e| VaultError::Storage(e.to_string()))?;

            match result {
                Some(record) => Ok(Some(record?)),
                None => Ok(None),
            }
        })
    }

    /// Case-insensitive substring search over the serialized metadata text
    /// and the file type tag, in storage order.
    ///
    /// Blank queries are the router's job to reject before calling in.
    pub fn search(&self, query: &str, limit: usize) -> Result<Vec<MediaRecord>, VaultError> {
        let pattern = escape_like(query);

        self.db.with_conn(|conn| {
            let mut stmt = conn
                .prepare(&format!(
                    "SELECT {SELECT_COLUMNS} FROM media_files
                     WHERE (meta_data IS NOT NULL AND meta_data LIKE '%' || ?1 || '%' ESCAPE '\\')
                        OR file_type LIKE '%' || ?1 || '%' ESCAPE '\\'
                     ORDER BY id
                     LIMIT ?2"
                ))
                .map_err(|e| VaultError::Storage(e.to_string()))?;

            let rows = stmt
                .query_map(rusqlite::params![pattern, limit as i64], |row| {
                    Ok(row_to_record(row))
                })
                .map_err(|e| VaultError::Storage(e.to_string()))?;

            collect_records(rows)
        })
    }

    /// Fetch up to `limit` most recent records, newest first.
    pub fn list_recent(&self, limit: usize) -> Result<Vec<MediaRecord>, VaultError> {
        self.db.with_conn(|conn| {
            let mut stmt = conn
                .prepare(&format!(
                    "SELECT {SELECT_COLUMNS} FROM media_files
                     ORDER BY created_at DESC, id DESC
                     LIMIT ?1"
                ))
                .map_err(|e| VaultError::Storage(e.to_string()))?;

            let rows = stmt
                .query_map(rusqlite::params![limit as i64], |row| {
                    Ok(row_to_record(row))
                })
                .map_err(|e| VaultError::Storage(e.to_string()))?;

            collect_records(rows)
        })
    }

    /// Record count plus summed serialized-metadata length.
    pub fn stats(&self) -> Result<StoreStats, VaultError> {
        self.db.with_conn(|conn| {
            let (count, bytes): (i64, i64) = conn
                .query_row(
                    "SELECT COUNT(*), COALESCE(SUM(LENGTH(meta_data)), 0) FROM media_files",
                    [],
                    |row| Ok((row.get(0)?, row.get(1)?)),
                )
                .map_err(|e| VaultError::Storage(e.to_string()))?;

            Ok(StoreStats {
                record_count: count as u64,
                metadata_bytes: bytes as u64,
            })
        })
    }

    /// Delete all records created strictly before `now - days` and return
    /// the number removed.
    ///
    /// `days = 0` deletes everything created before the current instant.
    /// Idempotent absent new inserts.
    pub fn delete_older_than(&self, days: u32) -> Result<usize, VaultError> {
        let cutoff = Utc::now().timestamp() - i64::from(days) * 86_400;

        self.db.with_conn(|conn| {
            let deleted = conn
                .execute(
                    "DELETE FROM media_files WHERE created_at < ?1",
                    rusqlite::params![cutoff],
                )
                .map_err(|e| VaultError::Storage(format!("Age-based delete failed: {}", e)))?;

            info!(deleted, days, "Deleted records older than threshold");
            Ok(deleted)
        })
    }

    /// Delete all records whose `created_at` date component is strictly
    /// before the given calendar date, returning the number removed.
    pub fn delete_before_date(&self, date: NaiveDate) -> Result<usize, VaultError> {
        let date_str = date.format("%Y-%m-%d").to_string();

        self.db.with_conn(|conn| {
            let deleted = conn
                .execute(
                    "DELETE FROM media_files WHERE date(created_at, 'unixepoch') < ?1",
                    rusqlite::params![date_str],
                )
                .map_err(|e| VaultError::Storage(format!("Date-based delete failed: {}", e)))?;

            info!(deleted, date = %date_str, "Deleted records before date");
            Ok(deleted)
        })
    }
}

/// Escape LIKE wildcards so user queries match literally.
fn escape_like(query: &str) -> String {
    query
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

fn collect_records<I>(rows: I) -> Result<Vec<MediaRecord>, VaultError>
where
    I: Iterator<Item = Result<Result<MediaRecord, VaultError>, rusqlite::Error>>,
{
    let mut records = Vec::new();
    for row in rows {
        let record = row.map_err(|e| VaultError::Storage(e.to_string()))??;
        records.push(record);
    }
    Ok(records)
}

fn row_to_record(row: &rusqlite::Row<'_>) -> Result<MediaRecord, VaultError> {
    let id: i64 = row.get(0).map_err(|e| VaultError::Storage(e.to_string()))?;
    let file_id: String = row.get(1).map_err(|e| VaultError::Storage(e.to_string()))?;
    let file_type: String = row.get(2).map_err(|e| VaultError::Storage(e.to_string()))?;
    let user_id: Option<i64> = row.get(3).map_err(|e| VaultError::Storage(e.to_string()))?;
    let meta_text: Option<String> = row.get(4).map_err(|e| VaultError::Storage(e.to_string()))?;
    let created_at: i64 = row.get(5).map_err(|e| VaultError::Storage(e.to_string()))?;

    let metadata = match meta_text {
        Some(text) => Some(
            serde_json::from_str::<MediaMetadata>(&text)
                .map_err(|e| VaultError::Storage(format!("Invalid metadata JSON: {}", e)))?,
        ),
        None => None,
    };

    Ok(MediaRecord {
        id,
        file_id,
        // The schema CHECK restricts file_type, but fall back to document
        // rather than failing the whole row if it ever drifts.
        kind: MediaKind::parse(&file_type).unwrap_or(MediaKind::Document),
        user_id,
        metadata,
        created_at: Utc
            .timestamp_opt(created_at, 0)
            .single()
            .unwrap_or_default(),
    })
}
