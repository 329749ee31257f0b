//! `LocalStore` backed by a single `kv` table in a SQLite WAL database.
//!
//! Busy or locked databases are retried with backoff, and an optional byte quota
//! turns oversized writes into `StoreError::QuotaExceeded`.

use crate::local_store::{LocalStore, StoreError};
use anyhow::{Context, Result};
use rusqlite::{params, Connection, ErrorCode, OptionalExtension};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

const BUSY_RETRIES: u32 = 3;

pub struct SqliteStore {
    conn: Connection,
    path: PathBuf,
    /// Total bytes (keys + values) the table may hold; 0 disables the check.
    quota_bytes: u64,
}

impl SqliteStore {
    /// Open (or create) the database, enable WAL mode and initialise the schema.
    pub fn open(path: &Path, quota_bytes: u64) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create store directory {}", parent.display())
                })?;
            }
        }
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open local store at {}", path.display()))?;
        configure_connection(&conn)?;
        init_schema(&conn)?;
        Ok(Self {
            conn,
            path: path.to_path_buf(),
            quota_bytes,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Bytes currently held, excluding the entry at `skip_key`.
    fn used_bytes_except(&self, skip_key: &str) -> Result<u64, StoreError> {
        let used: i64 = self.conn.query_row(
            "SELECT COALESCE(SUM(LENGTH(CAST(key AS BLOB)) + LENGTH(CAST(value AS BLOB))), 0)
             FROM kv WHERE key != ?1",
            params![skip_key],
            |row| row.get(0),
        )?;
        Ok(used.max(0) as u64)
    }

    fn check_quota(&self, key: &str, value: &str) -> Result<(), StoreError> {
        if self.quota_bytes == 0 {
            return Ok(());
        }
        let needed = (key.len() + value.len()) as u64;
        let used = self.used_bytes_except(key)?;
        if used + needed > self.quota_bytes {
            return Err(StoreError::QuotaExceeded {
                key: key.to_string(),
                needed,
                limit: self.quota_bytes.saturating_sub(used),
            });
        }
        Ok(())
    }
}

fn configure_connection(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "PRAGMA journal_mode=WAL;
         PRAGMA synchronous=NORMAL;
         PRAGMA busy_timeout=2500;",
    )
    .context("Failed to configure local store connection")?;
    Ok(())
}

fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS kv (
            key        TEXT    PRIMARY KEY,
            value      TEXT    NOT NULL,
            updated_at INTEGER NOT NULL
         );",
    )
    .context("Failed to initialise local store schema")?;
    Ok(())
}

impl LocalStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        with_retry(BUSY_RETRIES, || {
            self.conn
                .query_row(
                    "SELECT value FROM kv WHERE key = ?1",
                    params![key],
                    |row| row.get(0),
                )
                .optional()
        })
        .map_err(StoreError::from)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.check_quota(key, value)?;
        let now = epoch_secs(SystemTime::now()) as i64;
        with_retry(BUSY_RETRIES, || {
            self.conn.execute(
                "INSERT OR REPLACE INTO kv (key, value, updated_at) VALUES (?1, ?2, ?3)",
                params![key, value, now],
            )
        })?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        with_retry(BUSY_RETRIES, || {
            self.conn
                .execute("DELETE FROM kv WHERE key = ?1", params![key])
        })?;
        Ok(())
    }
}

fn is_busy(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.code == ErrorCode::DatabaseBusy || e.code == ErrorCode::DatabaseLocked
    )
}

/// Retry on SQLITE_BUSY when several processes share the database file.
/// Backoff: 100ms, 200ms, 400ms.
fn with_retry<T, F: Fn() -> rusqlite::Result<T>>(max_retries: u32, op: F) -> rusqlite::Result<T> {
    let mut attempt = 0;
    loop {
        match op() {
            Ok(val) => return Ok(val),
            Err(e) => {
                if !is_busy(&e) || attempt >= max_retries {
                    return Err(e);
                }
                attempt += 1;
                let backoff_ms = 100 * (1u64 << (attempt - 1));
                tracing::debug!(attempt, backoff_ms, "local store busy, retrying");
                std::thread::sleep(Duration::from_millis(backoff_ms));
            }
        }
    }
}

fn epoch_secs(t: SystemTime) -> u64 {
    t.duration_since(UNIX_EPOCH).map(|d| d.as_secs()).unwrap_or(0)
}
