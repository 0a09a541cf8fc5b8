//! Durable slots for the session's locale choice.

use std::collections::HashMap;
use std::path::{
    Path,
    PathBuf,
};

use serde_json::{
    Map,
    Value,
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Failed to access storage file '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Storage file '{}' is not a JSON object: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Key/value storage that survives reloads (e.g. a browser's local storage).
pub trait LocaleStorage {
    /// Value stored under `key`, if any.
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Stores `value` under `key`, synchronously.
    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// In-process storage; nothing outlives the value.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    slots: HashMap<String, String>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage pre-populated with a single slot.
    #[must_use]
    pub fn with_slot(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self { slots: HashMap::from([(key.into(), value.into())]) }
    }
}

impl LocaleStorage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.slots.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.slots.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// JSON object file, one member per slot. Other members are preserved.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    #[must_use]
    pub const fn new(path: PathBuf) -> Self {
        Self { path }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current file content; a missing file reads as an empty object.
    fn read_slots(&self) -> Result<Map<String, Value>, StorageError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(source) => return Err(StorageError::Io { path: self.path.clone(), source }),
        };

        serde_json::from_str(&content)
            .map_err(|source| StorageError::Parse { path: self.path.clone(), source })
    }
}

impl LocaleStorage for FileStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.read_slots()?.get(key).and_then(Value::as_str).map(str::to_string))
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        // 壊れたファイルは上書きする
        let mut slots = self.read_slots().unwrap_or_else(|e| {
            tracing::warn!("Replacing unreadable storage file: {e}");
            Map::new()
        });
        slots.insert(key.to_string(), Value::String(value.to_string()));

        let io_error = |source: std::io::Error| StorageError::Io { path: self.path.clone(), source };
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(io_error)?;
        }
        let content = serde_json::to_string_pretty(&Value::Object(slots))
            .map_err(|source| StorageError::Parse { path: self.path.clone(), source })?;
        std::fs::write(&self.path, content + "\n").map_err(io_error)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::fs;

    use googletest::prelude::*;
    use tempfile::TempDir;

    use super::*;

    #[googletest::test]
    fn memory_storage_round_trip() {
        let mut storage = MemoryStorage::new();

        expect_that!(storage.read("locale").unwrap(), none());
        storage.write("locale", "nl").unwrap();
        expect_that!(storage.read("locale").unwrap(), some(eq("nl")));
    }

    #[googletest::test]
    fn file_storage_missing_file_reads_none() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path().join("session.json"));

        expect_that!(storage.read("locale").unwrap(), none());
    }

    #[googletest::test]
    fn file_storage_persists_and_keeps_other_slots() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("state/session.json");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, r#"{"theme": "dark"}"#).unwrap();

        let mut storage = FileStorage::new(path.clone());
        storage.write("locale", "fr").unwrap();

        let reopened = FileStorage::new(path.clone());
        expect_that!(reopened.read("locale").unwrap(), some(eq("fr")));
        expect_that!(reopened.read("theme").unwrap(), some(eq("dark")));
    }

    #[googletest::test]
    fn file_storage_creates_parent_directories() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested/dir/session.json");

        let mut storage = FileStorage::new(path.clone());
        storage.write("locale", "nl").unwrap();

        expect_that!(path.exists(), eq(true));
    }

    #[googletest::test]
    fn file_storage_corrupt_file_is_an_error_on_read_and_replaced_on_write() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("session.json");
        fs::write(&path, "not json").unwrap();

        let mut storage = FileStorage::new(path);
        expect_that!(matches!(storage.read("locale"), Err(StorageError::Parse { .. })), eq(true));

        storage.write("locale", "en").unwrap();
        expect_that!(storage.read("locale").unwrap(), some(eq("en")));
    }

    #[googletest::test]
    fn file_storage_ignores_non_string_slot() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("session.json");
        fs::write(&path, r#"{"locale": 3}"#).unwrap();

        expect_that!(FileStorage::new(path).read("locale").unwrap(), none());
    }
}
