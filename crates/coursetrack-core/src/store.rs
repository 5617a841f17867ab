//! Progress persistence with write-through to a key/value storage backend.
//!
//! The store keeps the current [`ProgressRecord`] in memory and writes it
//! through on every change. Storage failures never reach the caller: the
//! store logs them and keeps working from memory for the rest of the session.

use std::collections::HashMap;
use std::path::PathBuf;

use crate::error::StorageError;
use crate::progress::{ProgressPatch, ProgressRecord};

/// Key the progress record is stored under. Bump the version suffix when the
/// persisted layout changes so old data is left alone.
pub const STORAGE_KEY: &str = "coursetrack.progress.v1";

/// A synchronous string key/value store.
pub trait Storage {
    /// Read the value for `key`, `None` if nothing is stored.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace the value for `key`.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Stores each key as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path of the file backing `key`. Characters outside `[A-Za-z0-9._-]` map to `_`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        let file: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.dir.join(format!("{file}.json"))
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key);
        match std::fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::io(key, e)),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        std::fs::create_dir_all(&self.dir).map_err(|e| StorageError::io(key, e))?;
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, value).map_err(|e| StorageError::io(key, e))?;
        std::fs::rename(&tmp, &path).map_err(|e| StorageError::io(key, e))?;
        Ok(())
    }
}

/// In-process storage, lost when the process exits.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seed a value, e.g. data left by an earlier session.
    pub fn with_entry(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries.insert(key.into(), value.into());
        self
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Owns the current progress record and its persistence.
pub struct ProgressStore {
    storage: Box<dyn Storage>,
    record: ProgressRecord,
    persistent: bool,
}

impl ProgressStore {
    /// Open the store and read whatever record the backend holds.
    pub fn open(storage: Box<dyn Storage>) -> Self {
        let mut store = Self {
            storage,
            record: ProgressRecord::default(),
            persistent: true,
        };
        store.load();
        store
    }

    /// Open a store backed by files in `dir`.
    pub fn open_dir(dir: impl Into<PathBuf>) -> Self {
        Self::open(Box::new(FileStorage::new(dir)))
    }

    /// Open a store that never touches the filesystem.
    pub fn in_memory() -> Self {
        Self::open(Box::new(MemoryStorage::new()))
    }

    /// Re-read the persisted record.
    ///
    /// Missing or malformed data yields the empty default record. While the
    /// backend is failing, the in-memory record is returned instead.
    pub fn load(&mut self) -> ProgressRecord {
        if !self.persistent {
            return self.record.clone();
        }

        match self.storage.get(STORAGE_KEY) {
            Ok(Some(raw)) => {
                self.record = match serde_json::from_str::<ProgressRecord>(&raw) {
                    Ok(record) => record,
                    Err(e) => {
                        tracing::warn!("stored progress is malformed, starting fresh: {e}");
                        ProgressRecord::default()
                    }
                };
            }
            Ok(None) => {
                tracing::debug!("no stored progress under {STORAGE_KEY}");
                self.record = ProgressRecord::default();
            }
            Err(e) => {
                tracing::warn!("progress storage unreadable, continuing in memory: {e}");
                self.persistent = false;
            }
        }

        self.record.clone()
    }

    /// Shallow-merge `patch` onto the current record and persist the result.
    pub fn update(&mut self, patch: ProgressPatch) -> ProgressRecord {
        let next = std::mem::take(&mut self.record).merged(patch);
        self.record = next;
        self.persist();
        self.record.clone()
    }

    /// Replace the record with the empty default and persist it.
    pub fn reset(&mut self) -> ProgressRecord {
        self.record = ProgressRecord::default();
        self.persist();
        tracing::info!("progress reset");
        self.record.clone()
    }

    /// The current in-memory record.
    pub fn record(&self) -> &ProgressRecord {
        &self.record
    }

    /// `false` once a storage operation has failed and the last write did not
    /// reach the backend.
    pub fn is_persistent(&self) -> bool {
        self.persistent
    }

    fn persist(&mut self) {
        let result = serde_json::to_string(&self.record)
            .map_err(StorageError::from)
            .and_then(|json| self.storage.set(STORAGE_KEY, &json));

        match result {
            Ok(()) => {
                if !self.persistent {
                    tracing::info!("progress storage available again");
                }
                self.persistent = true;
            }
            Err(e) => {
                tracing::warn!("failed to persist progress, keeping it in memory: {e}");
                self.persistent = false;
            }
        }
    }
}

impl std::fmt::Debug for ProgressStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgressStore")
            .field("record", &self.record)
            .field("persistent", &self.persistent)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{BTreeMap, BTreeSet};

    use super::*;
    use crate::progress::QuizScore;

    /// Backend that fails every call, like a browser with storage disabled.
    struct BrokenStorage;

    impl Storage for BrokenStorage {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Unavailable("storage disabled".into()))
        }

        fn set(&mut self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable("quota exceeded".into()))
        }
    }

    /// Backend that reads fine but rejects writes.
    struct ReadOnlyStorage(MemoryStorage);

    impl Storage for ReadOnlyStorage {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.0.get(key)
        }

        fn set(&mut self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable("quota exceeded".into()))
        }
    }

    fn lessons(ids: &[&str]) -> BTreeSet<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn empty_backend_loads_default() {
        let mut store = ProgressStore::in_memory();
        assert_eq!(store.load(), ProgressRecord::default());
        assert!(store.is_persistent());
    }

    #[test]
    fn read_after_write_is_stable() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = ProgressStore::open_dir(dir.path());

        let updated = store.update(
            ProgressPatch::default()
                .completed_lessons(lessons(&["m1l1", "m1l2"]))
                .holder_name("Ada Lovelace"),
        );

        let first = store.load();
        let second = store.load();
        assert_eq!(first, updated);
        assert_eq!(first, second);
        assert!(first.is_lesson_completed("m1l2"));
        assert_eq!(first.holder_name.as_deref(), Some("Ada Lovelace"));
    }

    #[test]
    fn record_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let mut store = ProgressStore::open_dir(dir.path());
            store.update(
                ProgressPatch::default()
                    .quiz_scores(BTreeMap::from([("m1".to_string(), QuizScore::new(3, 4))])),
            );
        }

        let reopened = ProgressStore::open_dir(dir.path());
        assert_eq!(reopened.record().quiz_score("m1"), Some(QuizScore::new(3, 4)));
    }

    #[test]
    fn reset_then_load_yields_default() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = ProgressStore::open_dir(dir.path());
        store.update(
            ProgressPatch::default()
                .completed_lessons(lessons(&["a"]))
                .certificate_issued(true),
        );

        store.reset();
        assert_eq!(store.load(), ProgressRecord::default());

        let reopened = ProgressStore::open_dir(dir.path());
        assert_eq!(reopened.record(), &ProgressRecord::default());
    }

    #[test]
    fn malformed_data_falls_back_to_default() {
        let storage = MemoryStorage::new().with_entry(STORAGE_KEY, "{not json");
        let store = ProgressStore::open(Box::new(storage));
        assert_eq!(store.record(), &ProgressRecord::default());
        assert!(store.is_persistent());
    }

    #[test]
    fn wrongly_typed_data_falls_back_to_default() {
        let storage =
            MemoryStorage::new().with_entry(STORAGE_KEY, r#"{"completedLessons": ["m1l1"]}"#);
        let store = ProgressStore::open(Box::new(storage));
        assert!(store.record().completed_lessons.is_empty());
    }

    #[test]
    fn broken_backend_degrades_to_memory() {
        let mut store = ProgressStore::open(Box::new(BrokenStorage));
        assert!(!store.is_persistent());

        store.update(ProgressPatch::default().completed_lessons(lessons(&["m1l1"])));
        assert!(store.load().is_lesson_completed("m1l1"));
        assert!(!store.is_persistent());

        assert_eq!(store.reset(), ProgressRecord::default());
    }

    #[test]
    fn failed_write_keeps_in_memory_record() {
        let seeded = MemoryStorage::new().with_entry(
            STORAGE_KEY,
            r#"{"completedLessons":{"m1l1":true},"quizScores":{},"certificateIssued":false}"#,
        );
        let mut store = ProgressStore::open(Box::new(ReadOnlyStorage(seeded)));
        assert!(store.record().is_lesson_completed("m1l1"));

        store.update(ProgressPatch::default().completed_lessons(lessons(&["m1l1", "m1l2"])));
        assert!(!store.is_persistent());

        // The stale persisted copy must not replace the newer in-memory one.
        let loaded = store.load();
        assert!(loaded.is_lesson_completed("m1l2"));
    }

    #[test]
    fn file_names_are_sanitized() {
        let storage = FileStorage::new("/tmp/data");
        assert_eq!(
            storage.path_for("course:v1/x"),
            PathBuf::from("/tmp/data/course_v1_x.json")
        );
        assert_eq!(
            storage.path_for(STORAGE_KEY),
            PathBuf::from("/tmp/data/coursetrack.progress.v1.json")
        );
    }

    #[test]
    fn persisted_layout_uses_versioned_key() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = ProgressStore::open_dir(dir.path());
        store.update(ProgressPatch::default().certificate_issued(true));

        let raw = std::fs::read_to_string(dir.path().join("coursetrack.progress.v1.json")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["certificateIssued"], true);
        assert!(value["completedLessons"].as_object().unwrap().is_empty());
    }
}
