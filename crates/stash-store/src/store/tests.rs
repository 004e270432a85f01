//! Unit tests for the ingestion and retrieval workflows

use super::*;

use std::sync::{Arc, Barrier};
use std::thread;
use tempfile::tempdir;

/// Repository whose checksum lookup never sees existing rows, as if another
/// writer inserted between the lookup and the insert
struct StaleLookup {
    inner: SqliteRepository,
}

impl RecordRepository for StaleLookup {
    fn find_by_checksum(&self, _checksum: &str) -> StoreResult<Option<FileRecord>> {
        Ok(None)
    }

    fn find_by_filename(&self, filename: &str) -> StoreResult<Option<FileRecord>> {
        self.inner.find_by_filename(filename)
    }

    fn insert(&self, filename: &str, checksum: &str, content: &[u8], size: i64) -> StoreResult<FileRecord> {
        self.inner.insert(filename, checksum, content, size)
    }

    fn list(&self) -> StoreResult<Vec<FileSummary>> {
        self.inner.list()
    }

    fn count(&self) -> StoreResult<u64> {
        self.inner.count()
    }
}

/// Repository that holds every caller at a barrier between the duplicate
/// check and the insert, so two writers both pass the check
struct GatedRepository {
    inner: SqliteRepository,
    gate: Arc<Barrier>,
}

impl RecordRepository for GatedRepository {
    fn find_by_checksum(&self, checksum: &str) -> StoreResult<Option<FileRecord>> {
        let found = self.inner.find_by_checksum(checksum)?;
        self.gate.wait();
        Ok(found)
    }

    fn find_by_filename(&self, filename: &str) -> StoreResult<Option<FileRecord>> {
        self.inner.find_by_filename(filename)
    }

    fn insert(&self, filename: &str, checksum: &str, content: &[u8], size: i64) -> StoreResult<FileRecord> {
        self.inner.insert(filename, checksum, content, size)
    }

    fn list(&self) -> StoreResult<Vec<FileSummary>> {
        self.inner.list()
    }

    fn count(&self) -> StoreResult<u64> {
        self.inner.count()
    }
}

/// Repository whose storage has gone away
struct BrokenRepository;

impl RecordRepository for BrokenRepository {
    fn find_by_checksum(&self, _checksum: &str) -> StoreResult<Option<FileRecord>> {
        Err(StashError::StorageUnavailable {
            message: "database is gone".to_string(),
            source: None,
        })
    }

    fn find_by_filename(&self, _filename: &str) -> StoreResult<Option<FileRecord>> {
        Err(StashError::StorageUnavailable {
            message: "database is gone".to_string(),
            source: None,
        })
    }

    fn insert(&self, _: &str, _: &str, _: &[u8], _: i64) -> StoreResult<FileRecord> {
        unreachable!("lookup fails first")
    }

    fn list(&self) -> StoreResult<Vec<FileSummary>> {
        Ok(Vec::new())
    }

    fn count(&self) -> StoreResult<u64> {
        Ok(0)
    }
}

#[test]
fn test_ingest_inserts_new_content() {
    let store = ContentStore::open_in_memory().unwrap();

    let outcome = store.ingest("photo.jpg", b"jpeg bytes").unwrap();
    let record = outcome.record().unwrap();
    assert_eq!(record.filename, "photo.jpg");
    assert_eq!(record.checksum, digest(b"jpeg bytes"));
    assert_eq!(record.size, 10);
}

#[test]
fn test_identical_content_is_skipped() {
    let store = ContentStore::open_in_memory().unwrap();

    let first = store.ingest("f1.bin", b"same").unwrap();
    let second = store.ingest("f2.bin", b"same").unwrap();

    assert!(first.is_inserted());
    assert_eq!(second, IngestOutcome::Skipped(digest(b"same")));
    assert_eq!(store.repository().count().unwrap(), 1);
    assert!(store.retrieve("f2.bin").unwrap().is_none());
}

#[test]
fn test_same_filename_distinct_content() {
    let store = ContentStore::open_in_memory().unwrap();

    let hello = store.ingest("a.txt", b"hello").unwrap();
    let world = store.ingest("a.txt", b"world").unwrap();
    assert!(hello.is_inserted());
    assert!(world.is_inserted());
    assert_ne!(hello.checksum(), world.checksum());

    let listed = store.list().unwrap();
    assert_eq!(listed.len(), 2);
    assert!(listed.iter().all(|s| s.filename == "a.txt"));

    // Lowest id wins the filename tie
    assert_eq!(store.retrieve("a.txt").unwrap().unwrap(), b"hello");
}

#[test]
fn test_retrieve_missing_is_none() {
    let store = ContentStore::open_in_memory().unwrap();
    assert!(store.retrieve("never-ingested.bin").unwrap().is_none());
}

#[test]
fn test_empty_content_round_trip() {
    let store = ContentStore::open_in_memory().unwrap();

    let outcome = store.ingest("empty.bin", b"").unwrap();
    let record = outcome.record().unwrap();
    assert_eq!(record.size, 0);
    assert_eq!(record.checksum, digest(b""));

    let retrieved = store.retrieve("empty.bin").unwrap().unwrap();
    assert!(retrieved.is_empty());
}

#[test]
fn test_constraint_violation_becomes_skip() {
    let store = ContentStore::new(StaleLookup {
        inner: SqliteRepository::open_in_memory().unwrap(),
    });

    assert!(store.ingest("a.bin", b"payload").unwrap().is_inserted());
    let second = store.ingest("b.bin", b"payload").unwrap();
    assert_eq!(second, IngestOutcome::Skipped(digest(b"payload")));
    assert_eq!(store.repository().count().unwrap(), 1);
}

#[test]
fn test_storage_failure_propagates() {
    let store = ContentStore::new(BrokenRepository);

    assert!(matches!(
        store.ingest("a.bin", b"x"),
        Err(StashError::StorageUnavailable { .. })
    ));
    assert!(matches!(
        store.retrieve("a.bin"),
        Err(StashError::StorageUnavailable { .. })
    ));
}

#[test]
fn test_records_persist_across_reopen() {
    let temp_dir = tempdir().unwrap();
    let db_path = temp_dir.path().join("files.db");

    {
        let store = ContentStore::open(&db_path).unwrap();
        store.ingest("persist.txt", b"durable").unwrap();
    }

    let store = ContentStore::open(&db_path).unwrap();
    assert_eq!(store.retrieve("persist.txt").unwrap().unwrap(), b"durable");
    assert!(store.ingest("again.txt", b"durable").unwrap().is_skipped());
}

#[test]
fn test_concurrent_ingest_stores_once() {
    let temp_dir = tempdir().unwrap();
    let db_path = temp_dir.path().join("files.db");
    // Create the schema up front so both writers open a ready database
    ContentStore::open(&db_path).unwrap();

    let gate = Arc::new(Barrier::new(2));
    let handles: Vec<_> = ["first.bin", "second.bin"]
        .into_iter()
        .map(|name| {
            let db_path = db_path.clone();
            let gate = gate.clone();
            thread::spawn(move || {
                let store = ContentStore::new(GatedRepository {
                    inner: SqliteRepository::open(&db_path).unwrap(),
                    gate,
                });
                store.ingest(name, b"contended payload").unwrap()
            })
        })
        .collect();

    let outcomes: Vec<IngestOutcome> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    assert_eq!(outcomes.iter().filter(|o| o.is_inserted()).count(), 1);
    assert_eq!(outcomes.iter().filter(|o| o.is_skipped()).count(), 1);
    assert!(outcomes.iter().all(|o| o.checksum() == digest(b"contended payload")));

    let store = ContentStore::open(&db_path).unwrap();
    assert_eq!(store.repository().count().unwrap(), 1);
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;
    use proptest::test_runner::Config as ProptestConfig;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]
        #[test]
        fn ingest_retrieve_round_trip(
            contents in prop::collection::vec(prop::collection::vec(any::<u8>(), 0..512), 1..8)
        ) {
            let store = ContentStore::open_in_memory().unwrap();

            for (i, content) in contents.iter().enumerate() {
                let filename = format!("file-{}.bin", i);
                let outcome = store.ingest(&filename, content).unwrap();
                prop_assert_eq!(outcome.checksum(), digest(content));

                if outcome.is_inserted() {
                    let retrieved = store.retrieve(&filename).unwrap().unwrap();
                    prop_assert_eq!(&retrieved, content);
                }
            }

            let mut unique: Vec<&Vec<u8>> = contents.iter().collect();
            unique.sort();
            unique.dedup();
            prop_assert_eq!(store.repository().count().unwrap(), unique.len() as u64);

            for summary in store.list().unwrap() {
                let record = store.record(&summary.filename).unwrap().unwrap();
                prop_assert!(record.is_consistent());
                prop_assert_eq!(record.size, summary.size);
            }
        }
    }
}
