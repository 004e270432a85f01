//! Content store workflows
//!
//! `ContentStore` is the handle every caller goes through. It owns one
//! repository and is constructed once per process; there is no global store.

use stash_core::error::StashError;
use stash_core::types::{FileRecord, FileSummary, IngestOutcome};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

use crate::digest::digest;
use crate::repository::{RecordRepository, SqliteRepository};
use crate::StoreResult;

/// Content-addressed file store
#[derive(Debug)]
pub struct ContentStore<R = SqliteRepository> {
    repo: R,
}

impl ContentStore<SqliteRepository> {
    /// Open a store backed by the SQLite database at `path`
    pub fn open<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        Ok(Self::new(SqliteRepository::open(path)?))
    }

    /// Open with an explicit busy timeout for multi-process use
    pub fn open_with_timeout<P: AsRef<Path>>(path: P, busy_timeout: Duration) -> StoreResult<Self> {
        Ok(Self::new(SqliteRepository::open_with_timeout(path, busy_timeout)?))
    }

    /// Open a throwaway in-memory store
    pub fn open_in_memory() -> StoreResult<Self> {
        Ok(Self::new(SqliteRepository::open_in_memory()?))
    }
}

impl<R: RecordRepository> ContentStore<R> {
    /// Wrap an existing repository
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Store `content` under `filename` unless identical content is already present
    ///
    /// The lookup before the insert only saves a write. The repository's
    /// uniqueness constraint is what guarantees one record per digest: losing
    /// a race to another writer surfaces as `ConstraintViolation`, which is
    /// reported here as `Skipped`.
    pub fn ingest(&self, filename: &str, content: &[u8]) -> StoreResult<IngestOutcome> {
        let checksum = digest(content);

        if self.repo.find_by_checksum(&checksum)?.is_some() {
            info!("File with the same checksum ({}) already exists", checksum);
            return Ok(IngestOutcome::Skipped(checksum));
        }

        let size = content.len() as i64;
        match self.repo.insert(filename, &checksum, content, size) {
            Ok(record) => {
                info!(
                    "Stored {} as record {} ({} bytes, checksum {})",
                    record.filename, record.id, record.size, record.checksum
                );
                Ok(IngestOutcome::Inserted(record))
            }
            Err(StashError::ConstraintViolation { checksum }) => {
                debug!("Concurrent writer stored checksum {} first", checksum);
                info!("File with the same checksum ({}) already exists", checksum);
                Ok(IngestOutcome::Skipped(checksum))
            }
            Err(e) => Err(e),
        }
    }

    /// Stored bytes for `filename`, or `None` if nothing was stored under it
    pub fn retrieve(&self, filename: &str) -> StoreResult<Option<Vec<u8>>> {
        Ok(self.record(filename)?.map(|record| record.content))
    }

    /// Full record for `filename`, using the repository's lowest-id tie-break
    pub fn record(&self, filename: &str) -> StoreResult<Option<FileRecord>> {
        let record = self.repo.find_by_filename(filename)?;
        if record.is_none() {
            info!("No such file found! ({})", filename);
        }
        Ok(record)
    }

    /// Summaries of every stored record
    pub fn list(&self) -> StoreResult<Vec<FileSummary>> {
        self.repo.list()
    }
}

#[cfg(test)]
mod tests;
