//! Core data types for the Stash content store.
//!
//! This module provides the fundamental types used throughout Stash:
//! - Stored file records and their payload-free summaries
//! - The outcome of an ingestion attempt

pub mod outcome;
pub mod record;

// Re-export all public types
pub use outcome::IngestOutcome;
pub use record::{FileRecord, FileSummary};
