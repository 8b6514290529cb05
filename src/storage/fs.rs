// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Plain filesystem operations backing the wallet.
//!
//! Records are written to a uniquely named temp file in the target directory
//! and then published with a hard link, which fails if the target already
//! exists. Readers never observe a half-written record and two writers racing
//! for the same name cannot both succeed.

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};

use super::StoragePaths;

/// Error type for wallet storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[source] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("Invalid label: {0:?}")]
    InvalidLabel(String),
}

impl From<io::Error> for StorageError {
    fn from(e: io::Error) -> Self {
        match e.kind() {
            io::ErrorKind::NotFound => StorageError::NotFound(e.to_string()),
            io::ErrorKind::AlreadyExists => StorageError::AlreadyExists(e.to_string()),
            _ => StorageError::Io(e),
        }
    }
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Filesystem storage rooted at the wallet directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    paths: StoragePaths,
}

impl FileStorage {
    /// Open storage at `paths`, creating the root directory if needed.
    pub fn open(paths: StoragePaths) -> StorageResult<Self> {
        fs::create_dir_all(paths.root()).map_err(StorageError::Io)?;
        Ok(Self { paths })
    }

    /// Storage handle that does not touch the filesystem until used.
    pub fn unopened(paths: StoragePaths) -> Self {
        Self { paths }
    }

    /// Get the storage paths.
    pub fn paths(&self) -> &StoragePaths {
        &self.paths
    }

    /// Read a JSON file and deserialize it.
    pub fn read_json<T: DeserializeOwned>(&self, path: impl AsRef<Path>) -> StorageResult<T> {
        let file = File::open(path.as_ref())?;
        let reader = BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }

    /// Write a JSON file only if nothing exists at `path` yet.
    pub fn create_json<T: Serialize>(
        &self,
        path: impl AsRef<Path>,
        value: &T,
    ) -> StorageResult<()> {
        let path = path.as_ref();
        let temp_path = self.write_temp(path, value)?;
        let linked = fs::hard_link(&temp_path, path);
        let _ = fs::remove_file(&temp_path);
        match linked {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                Err(StorageError::AlreadyExists(path.display().to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    fn write_temp<T: Serialize>(&self, path: &Path, value: &T) -> StorageResult<PathBuf> {
        let parent = path.parent().unwrap_or_else(|| self.paths.root());
        // A file in place of the directory reports `AlreadyExists`; that must
        // not read as an existing record.
        fs::create_dir_all(parent).map_err(StorageError::Io)?;

        let temp_path = parent.join(format!(".{}.tmp", uuid::Uuid::new_v4()));
        let written = (|| -> StorageResult<()> {
            let file = File::create(&temp_path)?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer(&mut writer, value)?;
            writer.flush()?;
            writer.get_ref().sync_all()?;
            Ok(())
        })();

        match written {
            Ok(()) => Ok(temp_path),
            Err(e) => {
                let _ = fs::remove_file(&temp_path);
                Err(e)
            }
        }
    }

    /// Check if a file exists.
    pub fn exists(&self, path: impl AsRef<Path>) -> bool {
        path.as_ref().is_file()
    }

    /// List the stems of files in `dir` with the given extension.
    pub fn list_files(&self, dir: impl AsRef<Path>, extension: &str) -> StorageResult<Vec<String>> {
        let dir = dir.as_ref();
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut ids = Vec::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if !path.is_file() || path.extension().map_or(true, |ext| ext != extension) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                ids.push(stem.to_string());
            }
        }
        ids.sort();
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    fn test_storage() -> (tempfile::TempDir, FileStorage) {
        let dir = tempfile::tempdir().expect("temp dir");
        let storage = FileStorage::open(StoragePaths::new(dir.path().join("wallet")))
            .expect("Failed to open test storage");
        (dir, storage)
    }

    #[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
    struct TestData {
        id: String,
        value: i32,
    }

    #[test]
    fn open_creates_root_directory() {
        let (_dir, storage) = test_storage();
        assert!(storage.paths().root().is_dir());
    }

    #[test]
    fn create_and_read_json() {
        let (_dir, storage) = test_storage();
        let data = TestData {
            id: "test-1".to_string(),
            value: 42,
        };

        let path = storage.paths().identity("test");
        storage.create_json(&path, &data).unwrap();

        let read: TestData = storage.read_json(&path).unwrap();
        assert_eq!(read, data);
    }

    #[test]
    fn create_json_refuses_existing_file() {
        let (_dir, storage) = test_storage();
        let path = storage.paths().identity("admin");
        let first = TestData { id: "admin".into(), value: 1 };

        storage.create_json(&path, &first).unwrap();
        let err = storage
            .create_json(&path, &TestData { id: "admin".into(), value: 2 })
            .unwrap_err();
        assert!(matches!(err, StorageError::AlreadyExists(_)));

        let read: TestData = storage.read_json(&path).unwrap();
        assert_eq!(read, first);
    }

    #[test]
    fn temp_files_are_cleaned_up() {
        let (_dir, storage) = test_storage();
        let path = storage.paths().identity("admin");
        storage.create_json(&path, &TestData { id: "a".into(), value: 1 }).unwrap();
        let _ = storage.create_json(&path, &TestData { id: "a".into(), value: 1 });

        let entries: Vec<_> = fs::read_dir(storage.paths().root())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(entries, vec!["admin.id".to_string()]);
    }

    #[test]
    fn list_files_returns_sorted_stems() {
        let (_dir, storage) = test_storage();

        for name in ["b", "a", "c"] {
            storage
                .create_json(storage.paths().identity(name), &TestData {
                    id: name.to_string(),
                    value: 0,
                })
                .unwrap();
        }
        fs::write(storage.paths().root().join("notes.txt"), b"ignored").unwrap();

        let ids = storage.list_files(storage.paths().root(), "id").unwrap();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn file_in_place_of_directory_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("wallet");
        fs::write(&blocker, b"not a directory").unwrap();
        let storage = FileStorage::unopened(StoragePaths::new(&blocker));

        let err = storage
            .create_json(storage.paths().identity("admin"), &TestData { id: "a".into(), value: 1 })
            .unwrap_err();
        assert!(matches!(err, StorageError::Io(_)));
        assert!(blocker.is_file());
    }

    #[test]
    fn missing_file_maps_to_not_found() {
        let (_dir, storage) = test_storage();
        let result = storage.read_json::<TestData>(storage.paths().identity("nobody"));
        assert!(matches!(result, Err(StorageError::NotFound(_))));
    }
}
