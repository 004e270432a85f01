//! # stash-core
//!
//! Core types and utilities shared across all Stash crates.
//!
//! This crate provides:
//! - `StashError` enum for unified error handling
//! - `FileRecord`, `FileSummary` and `IngestOutcome` data types
//! - Path helpers for materialising stored files on disk
//!
//! ## Architecture
//!
//! The crate is organized into modules:
//! - `types`: Core data types (FileRecord, IngestOutcome, etc.)
//! - `error`: Error types and result aliases
//! - `utils`: Utility functions and helpers

pub mod error;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use error::{StashError, StashResult};
pub use types::{FileRecord, FileSummary, IngestOutcome};
