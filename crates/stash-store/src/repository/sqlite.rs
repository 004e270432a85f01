//! SQLite-backed record repository
//!
//! One `files` table holds everything. Every write is a single INSERT under
//! autocommit, so a record is either fully present or absent.

use rusqlite::{params, Connection, ErrorCode, OptionalExtension, Row};
use stash_core::error::StashError;
use stash_core::types::{FileRecord, FileSummary};
use std::path::Path;
use std::time::Duration;
use tracing::debug;

use super::RecordRepository;
use crate::StoreResult;

/// How long a writer waits on a locked database before giving up
pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS files (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        filename TEXT,
        checksum TEXT UNIQUE,
        content BLOB,
        size INTEGER
    );
    CREATE INDEX IF NOT EXISTS idx_files_filename ON files (filename);
"#;

const SELECT_RECORD: &str = "SELECT id, filename, checksum, content, size FROM files";

/// Repository over a single SQLite database file
#[derive(Debug)]
pub struct SqliteRepository {
    conn: Connection,
    location: String,
}

impl SqliteRepository {
    /// Open (creating if needed) the database at `path`
    pub fn open<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        Self::open_with_timeout(path, DEFAULT_BUSY_TIMEOUT)
    }

    /// Open with an explicit busy timeout
    pub fn open_with_timeout<P: AsRef<Path>>(path: P, busy_timeout: Duration) -> StoreResult<Self> {
        let path = path.as_ref();
        let location = path.display().to_string();

        let conn = Connection::open(path)
            .map_err(|e| StashError::storage(format!("Failed to open database {}", location), e))?;

        Self::init(conn, location, busy_timeout)
    }

    /// Open a private in-memory database
    pub fn open_in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| StashError::storage("Failed to open in-memory database".to_string(), e))?;

        Self::init(conn, ":memory:".to_string(), DEFAULT_BUSY_TIMEOUT)
    }

    fn init(conn: Connection, location: String, busy_timeout: Duration) -> StoreResult<Self> {
        conn.busy_timeout(busy_timeout)
            .map_err(|e| StashError::storage("Failed to set busy timeout".to_string(), e))?;

        // In-memory databases answer "memory"; either reply is fine
        conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get::<_, String>(0))
            .map_err(|e| StashError::storage(format!("Failed to enable WAL for {}", location), e))?;

        conn.execute_batch(SCHEMA)
            .map_err(|e| StashError::storage(format!("Failed to initialize schema in {}", location), e))?;

        debug!("Opened file store at {}", location);
        Ok(Self { conn, location })
    }

    /// Where this repository lives, for messages
    pub fn location(&self) -> &str {
        &self.location
    }

    fn find_one(&self, column: &str, value: &str) -> StoreResult<Option<FileRecord>> {
        let sql = format!("{} WHERE {} = ?1 ORDER BY id LIMIT 1", SELECT_RECORD, column);

        self.conn
            .query_row(&sql, params![value], record_from_row)
            .optional()
            .map_err(|e| StashError::storage(format!("Failed to query files by {}", column), e))
    }
}

impl RecordRepository for SqliteRepository {
    fn find_by_checksum(&self, checksum: &str) -> StoreResult<Option<FileRecord>> {
        debug!("Looking up checksum {}", checksum);
        self.find_one("checksum", checksum)
    }

    fn find_by_filename(&self, filename: &str) -> StoreResult<Option<FileRecord>> {
        debug!("Looking up filename {}", filename);
        self.find_one("filename", filename)
    }

    fn insert(
        &self,
        filename: &str,
        checksum: &str,
        content: &[u8],
        size: i64,
    ) -> StoreResult<FileRecord> {
        if size < 0 || size as usize != content.len() {
            return Err(StashError::SizeMismatch {
                declared: size,
                actual: content.len(),
            });
        }

        let inserted = self.conn.execute(
            "INSERT INTO files (filename, checksum, content, size) VALUES (?1, ?2, ?3, ?4)",
            params![filename, checksum, content, size],
        );

        match inserted {
            Ok(_) => {
                let id = self.conn.last_insert_rowid();
                debug!("Inserted file {} as id {} ({} bytes)", filename, id, size);
                Ok(FileRecord {
                    id,
                    filename: filename.to_string(),
                    checksum: checksum.to_string(),
                    content: content.to_vec(),
                    size,
                })
            }
            Err(rusqlite::Error::SqliteFailure(err, _)) if is_unique_violation(&err) => {
                Err(StashError::ConstraintViolation {
                    checksum: checksum.to_string(),
                })
            }
            Err(e) => Err(StashError::storage(
                format!("Failed to insert {} into {}", filename, self.location),
                e,
            )),
        }
    }

    fn list(&self) -> StoreResult<Vec<FileSummary>> {
        let map_err = |e| StashError::storage("Failed to list files".to_string(), e);

        let mut stmt = self.conn
            .prepare("SELECT id, filename, checksum, size FROM files ORDER BY id")
            .map_err(map_err)?;

        let rows = stmt
            .query_map([], |row| {
                Ok(FileSummary {
                    id: row.get(0)?,
                    filename: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
                    checksum: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
                    size: row.get::<_, Option<i64>>(3)?.unwrap_or_default(),
                })
            })
            .map_err(map_err)?;

        rows.collect::<Result<Vec<_>, _>>().map_err(map_err)
    }

    fn count(&self) -> StoreResult<u64> {
        let count: i64 = self.conn
            .query_row("SELECT COUNT(*) FROM files", [], |row| row.get(0))
            .map_err(|e| StashError::storage("Failed to count files".to_string(), e))?;
        Ok(count as u64)
    }
}

fn record_from_row(row: &Row<'_>) -> rusqlite::Result<FileRecord> {
    Ok(FileRecord {
        id: row.get(0)?,
        filename: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
        checksum: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
        content: row.get::<_, Option<Vec<u8>>>(3)?.unwrap_or_default(),
        size: row.get::<_, Option<i64>>(4)?.unwrap_or_default(),
    })
}

fn is_unique_violation(err: &rusqlite::ffi::Error) -> bool {
    err.code == ErrorCode::ConstraintViolation
        && (err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
            || err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY)
}
