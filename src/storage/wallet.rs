// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Identity repository: the file-system wallet.
//!
//! Each principal is stored as `<wallet>/<label>.id`. Records are created once
//! and never rewritten; `put` refuses to replace an existing label.

use super::{paths::IDENTITY_EXTENSION, FileStorage, StorageError, StorageResult};
use crate::identity::X509Identity;

/// Repository for identity records on the wallet storage.
pub struct IdentityRepository<'a> {
    storage: &'a FileStorage,
}

impl<'a> IdentityRepository<'a> {
    pub fn new(storage: &'a FileStorage) -> Self {
        Self { storage }
    }

    /// Check if a principal has a record.
    pub fn exists(&self, label: &str) -> StorageResult<bool> {
        validate_label(label)?;
        Ok(self.storage.exists(self.storage.paths().identity(label)))
    }

    /// Load the record of a principal, `None` if it was never enrolled.
    pub fn get(&self, label: &str) -> StorageResult<Option<X509Identity>> {
        validate_label(label)?;
        match self.storage.read_json(self.storage.paths().identity(label)) {
            Ok(identity) => Ok(Some(identity)),
            Err(StorageError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Store a new record. Fails with `AlreadyExists` if the label is taken.
    pub fn put(&self, label: &str, identity: &X509Identity) -> StorageResult<()> {
        validate_label(label)?;
        self.storage
            .create_json(self.storage.paths().identity(label), identity)
            .map_err(|e| match e {
                StorageError::AlreadyExists(_) => {
                    StorageError::AlreadyExists(format!("Identity {label}"))
                }
                other => other,
            })
    }

    /// Labels of all stored identities, sorted.
    pub fn list(&self) -> StorageResult<Vec<String>> {
        self.storage
            .list_files(self.storage.paths().root(), IDENTITY_EXTENSION)
    }
}

/// Labels become file names; reject anything that could escape the wallet.
fn validate_label(label: &str) -> StorageResult<()> {
    let valid = !label.is_empty()
        && !label.starts_with('.')
        && !label.contains(['/', '\\', '\0']);
    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidLabel(label.to_string()))
    }
}
