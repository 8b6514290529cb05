// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Wallet Storage Module
//!
//! File-backed identity store compatible with the Fabric SDK file-system
//! wallet.
//!
//! ## Storage Layout
//!
//! ```text
//! wallet/
//!   admin.id      # CA administrator, written by enroll-admin
//!   appUser.id    # Application principal, written by register-user
//! ```
//!
//! Records hold a private key in clear text. Restrict permissions on the
//! wallet directory accordingly.

pub mod fs;
pub mod paths;
pub mod wallet;

pub use fs::{FileStorage, StorageError, StorageResult};
pub use paths::StoragePaths;
pub use wallet::IdentityRepository;
