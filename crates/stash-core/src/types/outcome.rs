//! Result of handing content to the store.

use super::FileRecord;

/// What ingestion did with a piece of content
///
/// Skipping is a normal outcome, not a failure: the content was already
/// stored under the returned checksum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestOutcome {
    /// First time this content was seen; a new record was written
    Inserted(FileRecord),
    /// Content already present; nothing was written
    Skipped(String),
}

impl IngestOutcome {
    /// Checksum of the ingested content, whichever way it went
    pub fn checksum(&self) -> &str {
        match self {
            IngestOutcome::Inserted(record) => &record.checksum,
            IngestOutcome::Skipped(checksum) => checksum,
        }
    }

    pub fn is_inserted(&self) -> bool {
        matches!(self, IngestOutcome::Inserted(_))
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, IngestOutcome::Skipped(_))
    }

    /// The new record, if one was written
    pub fn record(&self) -> Option<&FileRecord> {
        match self {
            IngestOutcome::Inserted(record) => Some(record),
            IngestOutcome::Skipped(_) => None,
        }
    }
}
