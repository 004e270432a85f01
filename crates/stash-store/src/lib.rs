//! Content-addressed file store for Stash
//!
//! Files are identified by the SHA-256 digest of their bytes. The digest is
//! unique across the store; filenames are informational and may repeat.
//!
//! - `digest`: the identity function
//! - `repository`: durable records in a SQLite `files` table
//! - `store`: ingestion and retrieval workflows over a repository

pub mod digest;
pub mod repository;
pub mod store;

// Re-export main types
pub use digest::{digest, ContentDigest};
pub use repository::{RecordRepository, SqliteRepository};
pub use store::ContentStore;

use stash_core::error::StashError;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StashError>;
