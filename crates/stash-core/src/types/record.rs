//! Stored file record types.
//!
//! A record is written exactly once, when its content digest is first seen,
//! and is never mutated afterwards.

use serde::{Deserialize, Serialize};

/// A file persisted in the store, payload included
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    /// Surrogate identifier assigned by the repository, never reused
    pub id: i64,
    /// Display name taken from the source URL; not unique
    pub filename: String,
    /// Hex digest of `content`; unique across the store
    pub checksum: String,
    /// Raw payload, stored verbatim
    pub content: Vec<u8>,
    /// Byte length of `content`
    pub size: i64,
}

impl FileRecord {
    /// Check the stored size against the payload length
    pub fn is_consistent(&self) -> bool {
        self.size >= 0 && self.size as usize == self.content.len()
    }

    /// Drop the payload, keeping the inspectable fields
    pub fn summary(&self) -> FileSummary {
        FileSummary {
            id: self.id,
            filename: self.filename.clone(),
            checksum: self.checksum.clone(),
            size: self.size,
        }
    }
}

/// A record without its payload, cheap to list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSummary {
    pub id: i64,
    pub filename: String,
    pub checksum: String,
    pub size: i64,
}

impl FileSummary {
    /// Format the size in human-readable units
    pub fn format_size(&self) -> String {
        const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
        let mut size = self.size as f64;
        let mut unit_index = 0;

        while size >= 1024.0 && unit_index < UNITS.len() - 1 {
            size /= 1024.0;
            unit_index += 1;
        }

        if unit_index == 0 {
            format!("{} {}", self.size, UNITS[unit_index])
        } else {
            format!("{:.1} {}", size, UNITS[unit_index])
        }
    }

    /// Leading characters of the checksum, enough to tell records apart in a listing
    pub fn short_checksum(&self) -> &str {
        let end = self.checksum.len().min(12);
        &self.checksum[..end]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(content: &[u8]) -> FileRecord {
        FileRecord {
            id: 1,
            filename: "photo.jpg".to_string(),
            checksum: "9f86d081884c7d659a2feaa0c55ad015a3bf4f1b2b0b822cd15d6c15b0f00a08".to_string(),
            content: content.to_vec(),
            size: content.len() as i64,
        }
    }

    #[test]
    fn test_record_consistency() {
        let mut rec = record(b"test");
        assert!(rec.is_consistent());

        rec.size = 10;
        assert!(!rec.is_consistent());
    }

    #[test]
    fn test_summary_drops_payload() {
        let rec = record(b"test");
        let summary = rec.summary();
        assert_eq!(summary.id, rec.id);
        assert_eq!(summary.filename, "photo.jpg");
        assert_eq!(summary.size, 4);
        assert_eq!(summary.short_checksum(), "9f86d081884c");
    }

    #[test]
    fn test_format_size() {
        let mut summary = record(b"").summary();
        assert_eq!(summary.format_size(), "0 B");

        summary.size = 1536;
        assert_eq!(summary.format_size(), "1.5 KB");

        summary.size = 1024 * 1024 * 1024 + 512 * 1024 * 1024;
        assert_eq!(summary.format_size(), "1.5 GB");
    }

    #[test]
    fn test_summary_json_shape() {
        let summary = record(b"abc").summary();
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["filename"], "photo.jpg");
        assert_eq!(json["size"], 3);
    }
}
