// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Path constants and utilities for the wallet layout.

use std::path::{Path, PathBuf};

/// Extension of identity records, as used by the Fabric file-system wallet.
pub const IDENTITY_EXTENSION: &str = "id";

/// Storage path utilities for the wallet directory.
#[derive(Debug, Clone)]
pub struct StoragePaths {
    root: PathBuf,
}

impl StoragePaths {
    /// Create a new StoragePaths with a custom root (useful for testing).
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Wallet directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path to the record of a principal.
    pub fn identity(&self, label: &str) -> PathBuf {
        self.root.join(format!("{label}.{IDENTITY_EXTENSION}"))
    }
}
