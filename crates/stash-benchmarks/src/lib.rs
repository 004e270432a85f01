//! Stash benchmarking suite
//!
//! Digest throughput and the two ingestion paths (insert and skip).

pub mod common;

pub use common::*;
