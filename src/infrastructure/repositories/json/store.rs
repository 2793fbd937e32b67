// src/infrastructure/repositories/json/store.rs

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::Serialize;
use tempfile::NamedTempFile;
use tracing::{debug, instrument, trace};

use super::error::{JsonStoreError, JsonStoreResult};
use super::formatter::HtmlSafeFormatter;
use super::model::JsonBookmark;
use crate::domain::bookmark::Bookmark;
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::repositories::store::BookmarkStore;

/// Bookmark store backed by a single JSON array file.
///
/// Every operation reads the whole file and every mutation rewrites it. A
/// single mutex is held across the full read-modify-write span. Separate
/// processes sharing the file are not coordinated.
#[derive(Debug)]
pub struct JsonBookmarkStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonBookmarkStore {
    /// The parent directory must exist; the file itself is created on the first write.
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock(&self) -> MutexGuard<'_, ()> {
        // the guard protects the file, not in-memory data, so a panic in
        // another holder leaves nothing inconsistent behind
        self.lock.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Read the full collection; a missing, empty or `null` file is empty
    #[instrument(skip(self), level = "trace")]
    fn load(&self) -> JsonStoreResult<Vec<JsonBookmark>> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                trace!("No bookmark file at {}, starting empty", self.path.display());
                return Ok(Vec::new());
            }
            Err(source) => {
                return Err(JsonStoreError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }

        let records: Option<Vec<JsonBookmark>> =
            serde_json::from_slice(&bytes).map_err(|source| JsonStoreError::Deserialize {
                path: self.path.clone(),
                source,
            })?;
        let records = records.unwrap_or_default();
        trace!("Loaded {} bookmarks", records.len());
        Ok(records)
    }

    /// Replace the file with the full collection.
    ///
    /// Content goes to a temporary sibling first and is renamed over the
    /// target, so a failed write leaves the previous file in place.
    #[instrument(skip(self, records), level = "trace", fields(count = records.len()))]
    fn save(&self, records: &[JsonBookmark]) -> JsonStoreResult<()> {
        let buf = encode(records)?;

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let io_err = |source: io::Error| JsonStoreError::Io {
            path: self.path.clone(),
            source,
        };

        let mut tmp = NamedTempFile::new_in(dir).map_err(io_err)?;
        tmp.write_all(&buf).map_err(io_err)?;
        tmp.as_file().sync_all().map_err(io_err)?;
        tmp.persist(&self.path).map_err(|e| io_err(e.error))?;

        trace!("Wrote {} bytes to {}", buf.len(), self.path.display());
        Ok(())
    }
}

/// Two-space indented array with a trailing newline
fn encode(records: &[JsonBookmark]) -> JsonStoreResult<Vec<u8>> {
    let mut buf = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, HtmlSafeFormatter::new());
    records.serialize(&mut ser)?;
    buf.push(b'\n');
    Ok(buf)
}

impl BookmarkStore for JsonBookmarkStore {
    #[instrument(skip(self, bookmark), level = "debug", fields(title = %bookmark.title))]
    fn add(&self, bookmark: &Bookmark) -> DomainResult<()> {
        let _guard = self.lock();

        let mut records = self.load()?;
        records.push(JsonBookmark::from(bookmark));
        self.save(&records)?;

        debug!("Stored bookmark, collection size {}", records.len());
        Ok(())
    }

    #[instrument(skip(self), level = "debug")]
    fn list(&self) -> DomainResult<Vec<Bookmark>> {
        let _guard = self.lock();

        let records = self.load()?;
        Ok(records.into_iter().map(Bookmark::from).collect())
    }

    #[instrument(skip(self), level = "debug")]
    fn delete(&self, title: &str) -> DomainResult<usize> {
        let _guard = self.lock();

        let records = self.load()?;
        let before = records.len();
        let kept: Vec<JsonBookmark> = records.into_iter().filter(|r| r.title != title).collect();

        let removed = before - kept.len();
        if removed == 0 {
            return Err(DomainError::BookmarkNotFound(title.to_string()));
        }

        self.save(&kept)?;
        debug!("Removed {} bookmarks titled '{}'", removed, title);
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::testing::{bookmark_at, init_test_env};
    use std::sync::Arc;
    use std::thread;
    use tempfile::TempDir;

    fn setup() -> (TempDir, JsonBookmarkStore) {
        let _ = init_test_env();
        let dir = tempfile::tempdir().unwrap();
        let store = JsonBookmarkStore::new(dir.path().join("test.json"));
        (dir, store)
    }

    fn read(store: &JsonBookmarkStore) -> String {
        fs::read_to_string(store.path()).unwrap()
    }

    #[test]
    fn given_empty_store_when_adding_then_writes_expected_json() -> DomainResult<()> {
        let (_dir, store) = setup();

        store.add(&bookmark_at("Test 1", "Test 1", 0))?;

        let expected = r#"[
  {
    "title": "Test 1",
    "content": "Test 1",
    "created_at": "2021-01-01T00:00:00Z"
  }
]
"#;
        assert_eq!(read(&store), expected);
        Ok(())
    }

    #[test]
    fn given_three_bookmarks_when_deleting_middle_then_others_keep_order() -> DomainResult<()> {
        let (_dir, store) = setup();
        for i in 0..3 {
            let title = format!("Test {}", i);
            store.add(&bookmark_at(&title, &title, i))?;
        }

        let removed = store.delete("Test 1")?;

        assert_eq!(removed, 1);
        let expected = r#"[
  {
    "title": "Test 0",
    "content": "Test 0",
    "created_at": "2021-01-01T00:00:00Z"
  },
  {
    "title": "Test 2",
    "content": "Test 2",
    "created_at": "2021-01-01T00:00:00.000000002Z"
  }
]
"#;
        assert_eq!(read(&store), expected);
        Ok(())
    }

    #[test]
    fn given_two_adds_when_reading_file_then_nanoseconds_are_kept() -> DomainResult<()> {
        let (_dir, store) = setup();
        for i in 0..2 {
            let title = format!("Test {}", i);
            store.add(&bookmark_at(&title, &title, i))?;
        }

        let expected = r#"[
  {
    "title": "Test 0",
    "content": "Test 0",
    "created_at": "2021-01-01T00:00:00Z"
  },
  {
    "title": "Test 1",
    "content": "Test 1",
    "created_at": "2021-01-01T00:00:00.000000001Z"
  }
]
"#;
        assert_eq!(read(&store), expected);
        Ok(())
    }

    #[test]
    fn given_added_bookmarks_when_listing_then_insertion_order_and_values() -> DomainResult<()> {
        let (_dir, store) = setup();
        let a = bookmark_at("A", "https://a.example", 1);
        let b = bookmark_at("B", "note b", 2);
        let c = bookmark_at("C", "https://c.example", 3);
        for bm in [&a, &b, &c] {
            store.add(bm)?;
        }

        assert_eq!(store.list()?, vec![a, b, c]);
        Ok(())
    }

    #[test]
    fn given_missing_file_when_listing_then_empty_and_no_file_created() -> DomainResult<()> {
        let (_dir, store) = setup();

        assert!(store.list()?.is_empty());
        assert!(!store.path().exists());
        Ok(())
    }

    #[test]
    fn given_missing_title_when_deleting_then_not_found_and_file_unchanged() -> DomainResult<()> {
        let (_dir, store) = setup();
        store.add(&bookmark_at("Test 0", "Test 0", 0))?;
        let before = fs::read(store.path())?;

        let err = store.delete("Nope").unwrap_err();

        assert!(matches!(err, DomainError::BookmarkNotFound(ref t) if t == "Nope"));
        assert_eq!(fs::read(store.path())?, before);
        Ok(())
    }

    #[test]
    fn given_missing_file_when_deleting_then_not_found_and_no_file_created() {
        let (_dir, store) = setup();

        let err = store.delete("Test").unwrap_err();

        assert!(matches!(err, DomainError::BookmarkNotFound(_)));
        assert!(!store.path().exists());
    }

    #[test]
    fn given_duplicate_titles_when_deleting_then_all_matches_removed() -> DomainResult<()> {
        let (_dir, store) = setup();
        store.add(&bookmark_at("dup", "first", 0))?;
        store.add(&bookmark_at("keep", "middle", 1))?;
        store.add(&bookmark_at("dup", "last", 2))?;

        let removed = store.delete("dup")?;

        assert_eq!(removed, 2);
        let remaining = store.list()?;
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].title, "keep");
        Ok(())
    }

    #[test]
    fn given_last_bookmark_when_deleting_then_file_holds_empty_array() -> DomainResult<()> {
        let (_dir, store) = setup();
        store.add(&bookmark_at("only", "only", 0))?;

        store.delete("only")?;

        assert_eq!(read(&store), "[]\n");
        assert!(store.list()?.is_empty());
        Ok(())
    }

    #[test]
    fn given_title_differing_in_case_when_deleting_then_not_found() -> DomainResult<()> {
        let (_dir, store) = setup();
        store.add(&bookmark_at("Test", "Test", 0))?;

        assert!(matches!(
            store.delete("test"),
            Err(DomainError::BookmarkNotFound(_))
        ));
        assert_eq!(store.list()?.len(), 1);
        Ok(())
    }

    #[test]
    fn given_null_or_blank_file_when_listing_then_empty() -> DomainResult<()> {
        let (_dir, store) = setup();

        fs::write(store.path(), "null\n")?;
        assert!(store.list()?.is_empty());

        fs::write(store.path(), "")?;
        assert!(store.list()?.is_empty());

        fs::write(store.path(), "  \n")?;
        assert!(store.list()?.is_empty());

        store.add(&bookmark_at("Test 1", "Test 1", 0))?;
        assert_eq!(store.list()?.len(), 1);
        Ok(())
    }

    #[test]
    fn given_malformed_file_when_loading_then_storage_error_and_file_untouched() -> DomainResult<()>
    {
        let (_dir, store) = setup();
        fs::write(store.path(), "[{\"title\": ")?;

        let err = store.list().unwrap_err();
        assert!(matches!(err, DomainError::StorageError(ref msg) if msg.contains("test.json")));

        let err = store.add(&bookmark_at("x", "y", 0)).unwrap_err();
        assert!(matches!(err, DomainError::StorageError(_)));
        assert_eq!(fs::read_to_string(store.path())?, "[{\"title\": ");
        Ok(())
    }

    #[test]
    fn given_missing_directory_when_adding_then_storage_error() {
        let _ = init_test_env();
        let dir = tempfile::tempdir().unwrap();
        let store = JsonBookmarkStore::new(dir.path().join("missing").join("test.json"));

        let err = store.add(&bookmark_at("x", "y", 0)).unwrap_err();

        assert!(matches!(err, DomainError::StorageError(_)));
    }

    #[test]
    fn given_html_in_fields_when_saving_then_escaped_and_round_trips() -> DomainResult<()> {
        let (_dir, store) = setup();
        let bm = bookmark_at("<b>Tom & Jerry</b>", "https://example.com/?a=1&b=2", 0);

        store.add(&bm)?;

        let raw = read(&store);
        assert!(raw.contains(r#""title": "\u003cb\u003eTom \u0026 Jerry\u003c/b\u003e""#));
        assert!(raw.contains(r#""content": "https://example.com/?a=1\u0026b=2""#));
        assert_eq!(store.list()?, vec![bm]);
        Ok(())
    }

    #[test]
    fn given_file_with_offset_timestamps_when_listing_then_parsed_as_utc() -> DomainResult<()> {
        let (_dir, store) = setup();
        fs::write(
            store.path(),
            r#"[{"title":"t","content":"c","created_at":"2021-01-01T01:00:00.000000003+01:00"}]"#,
        )?;

        let listed = store.list()?;

        assert_eq!(listed, vec![bookmark_at("t", "c", 3)]);
        Ok(())
    }

    #[test]
    fn given_record_with_offset_when_adding_another_then_its_text_is_kept() -> DomainResult<()> {
        let (_dir, store) = setup();
        fs::write(
            store.path(),
            r#"[{"title":"old","content":"c","created_at":"2024-05-01T12:00:00.5+02:00"}]"#,
        )?;

        store.add(&bookmark_at("new", "c", 0))?;

        let expected = r#"[
  {
    "title": "old",
    "content": "c",
    "created_at": "2024-05-01T12:00:00.5+02:00"
  },
  {
    "title": "new",
    "content": "c",
    "created_at": "2021-01-01T00:00:00Z"
  }
]
"#;
        assert_eq!(read(&store), expected);
        Ok(())
    }

    #[test]
    fn given_records_with_offsets_when_deleting_one_then_others_keep_text() -> DomainResult<()> {
        let (_dir, store) = setup();
        fs::write(
            store.path(),
            r#"[{"title":"a","content":"c","created_at":"2024-05-01T07:30:00.000000001-04:30"},{"title":"b","content":"c","created_at":"2024-05-01T12:00:00+02:00"}]"#,
        )?;

        store.delete("b")?;

        assert!(read(&store).contains(r#""created_at": "2024-05-01T07:30:00.000000001-04:30""#));
        Ok(())
    }

    #[test]
    fn given_concurrent_adds_when_listing_then_nothing_is_lost() -> DomainResult<()> {
        let (_dir, store) = setup();
        let store = Arc::new(store);

        let handles: Vec<_> = (0..4)
            .map(|t| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    for i in 0..10 {
                        let title = format!("t{}-{}", t, i);
                        store.add(&bookmark_at(&title, "c", i)).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let listed = store.list()?;
        assert_eq!(listed.len(), 40);
        // per-thread order is preserved
        for t in 0..4 {
            let prefix = format!("t{}-", t);
            let titles: Vec<_> = listed
                .iter()
                .filter(|b| b.title.starts_with(&prefix))
                .map(|b| b.title.clone())
                .collect();
            let expected: Vec<_> = (0..10).map(|i| format!("t{}-{}", t, i)).collect();
            assert_eq!(titles, expected);
        }
        Ok(())
    }
}
