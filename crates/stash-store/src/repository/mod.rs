//! Record repository
//!
//! Durable mapping from checksum to stored record, with a secondary lookup
//! by filename. Implementations must reject a second record for the same
//! checksum with `StashError::ConstraintViolation`, independent of any check
//! the caller made beforehand.

use stash_core::types::{FileRecord, FileSummary};

use crate::StoreResult;

pub mod sqlite;

pub use sqlite::SqliteRepository;

/// Storage backend for file records
pub trait RecordRepository {
    /// Point lookup by content checksum
    fn find_by_checksum(&self, checksum: &str) -> StoreResult<Option<FileRecord>>;

    /// Point lookup by display filename
    ///
    /// Several records may share a filename. The one with the lowest id,
    /// i.e. the earliest inserted, is returned.
    fn find_by_filename(&self, filename: &str) -> StoreResult<Option<FileRecord>>;

    /// Write a new record atomically and return it with its assigned id
    fn insert(
        &self,
        filename: &str,
        checksum: &str,
        content: &[u8],
        size: i64,
    ) -> StoreResult<FileRecord>;

    /// All records without payloads, ordered by id
    fn list(&self) -> StoreResult<Vec<FileSummary>>;

    /// Number of stored records
    fn count(&self) -> StoreResult<u64>;
}
