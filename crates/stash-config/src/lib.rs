//! Configuration parsing for Stash
//!
//! This crate handles parsing and validation of stash.toml files and layers
//! them with environment variables and command-line flags.

pub mod toml;
pub mod merge;

// Re-export main types
pub use crate::toml::{StashToml, StoreSection, FetchSection, ViewerSection};
pub use crate::merge::{ConfigLoader, ConfigLayering, ConfigSource};

use stash_core::error::StashError;

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, StashError>;
