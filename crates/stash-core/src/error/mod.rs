//! Error types and result aliases for Stash operations.
//!
//! Expected outcomes (duplicate content, a filename that was never stored)
//! are ordinary return values elsewhere; only real faults end up here.

use thiserror::Error;

/// Unified error type for all Stash operations
#[derive(Error, Debug)]
pub enum StashError {
    // Fetch errors
    #[error("Failed to download {url}: {message}")]
    Fetch {
        url: String,
        status: Option<u16>,
        message: String,
    },

    #[error("Network error: {message}")]
    Network {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    // Store errors
    #[error("A file with checksum {checksum} is already stored")]
    ConstraintViolation { checksum: String },

    #[error("Record size {declared} does not match content length {actual}")]
    SizeMismatch { declared: i64, actual: usize },

    #[error("Storage unavailable: {message}")]
    StorageUnavailable {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    // Config errors
    #[error("Failed to parse stash.toml: {message}")]
    TomlParse { message: String },

    #[error("Configuration field '{field}' is invalid: {reason}")]
    ConfigValidation { field: String, reason: String },

    // Viewer errors
    #[error("Failed to launch '{program}': {message}")]
    Launch { program: String, message: String },

    // IO errors
    #[error("IO error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for Stash operations
pub type StashResult<T> = Result<T, StashError>;

impl StashError {
    /// Create a network error from any error type
    pub fn network<E>(message: String, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Network {
            message,
            source: Some(Box::new(source)),
        }
    }

    /// Create a storage error from any error type
    pub fn storage<E>(message: String, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::StorageUnavailable {
            message,
            source: Some(Box::new(source)),
        }
    }

    /// Create an IO error from std::io::Error
    pub fn io(message: String, source: std::io::Error) -> Self {
        Self::Io { message, source }
    }

    /// Check if this error is recoverable
    ///
    /// Fetch failures halt a single pipeline run; everything else means the
    /// process cannot trust its environment.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, StashError::Fetch { .. } | StashError::Network { .. })
    }

    /// Get a user-friendly suggestion for fixing this error
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            StashError::Fetch { status: Some(404), .. } => {
                Some("Check the URL; the server reports the file does not exist")
            },
            StashError::Fetch { .. } | StashError::Network { .. } => {
                Some("Check your internet connection and try again")
            },
            StashError::InvalidUrl { .. } => {
                Some("Pass an absolute URL such as https://example.com/file.jpg")
            },
            StashError::StorageUnavailable { .. } => {
                Some("Check that the database path exists and is writable, or pass --database")
            },
            StashError::TomlParse { .. } | StashError::ConfigValidation { .. } => {
                Some("Fix stash.toml or remove it to fall back to defaults")
            },
            StashError::Launch { .. } => {
                Some("Use --no-launch and open the written file manually")
            },
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recoverable_errors() {
        let fetch = StashError::Fetch {
            url: "https://example.com/a.jpg".to_string(),
            status: Some(500),
            message: "server error".to_string(),
        };
        assert!(fetch.is_recoverable());

        let storage = StashError::StorageUnavailable {
            message: "disk gone".to_string(),
            source: None,
        };
        assert!(!storage.is_recoverable());

        let violation = StashError::ConstraintViolation { checksum: "ab".to_string() };
        assert!(!violation.is_recoverable());
    }

    #[test]
    fn test_suggestions() {
        let not_found = StashError::Fetch {
            url: "https://example.com/missing".to_string(),
            status: Some(404),
            message: "404 Not Found".to_string(),
        };
        assert!(not_found.suggestion().unwrap().contains("does not exist"));

        let io = StashError::io(
            "write failed".to_string(),
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(io.suggestion().is_none());
    }

    #[test]
    fn test_storage_error_keeps_source() {
        use std::error::Error as _;

        let err = StashError::storage(
            "Failed to open database".to_string(),
            std::io::Error::new(std::io::ErrorKind::NotFound, "no such directory"),
        );
        assert_eq!(err.to_string(), "Storage unavailable: Failed to open database");
        assert_eq!(err.source().unwrap().to_string(), "no such directory");
    }
}
