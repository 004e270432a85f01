//! Utility functions and helpers.
//!
//! Common functionality used across multiple Stash crates.

pub mod path;

// Re-export commonly used utilities
pub use path::{is_safe_path, materialize_path, normalize_path, sanitize_filename};
