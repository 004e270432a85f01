//! HTTP download client for Stash
//!
//! This crate fetches remote files with connection pooling and retry logic,
//! and derives a display filename from the URL they came from.

pub mod client;
pub mod filename;

// Re-export main types
pub use client::{FetchConfig, HttpFetcher, RetryConfig};
pub use filename::filename_from_url;

use stash_core::error::StashError;

/// Result type for fetch operations
pub type FetchResult<T> = Result<T, StashError>;
