// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Car Ledger Client - Hyperledger Fabric identity bootstrap and HTTP gateway
//!
//! Enrolls identities with the Fabric certificate authority, keeps them in a
//! file-system wallet, and exposes the `carApp` chaincode over REST.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `connection` - Fabric connection profile
//! - `enrollment` - Admin enrollment and app user registration
//! - `fabric` - CA and gateway clients behind capability traits
//! - `ledger` - Per-request session lifecycle
//! - `storage` - File-system identity wallet

pub mod api;
pub mod config;
pub mod connection;
pub mod enrollment;
pub mod error;
pub mod fabric;
pub mod identity;
pub mod ledger;
pub mod models;
pub mod state;
pub mod storage;
pub mod telemetry;

/// Install the ring crypto provider for rustls (must be done before any TLS operations).
pub fn install_crypto_provider() {
    // Err means a provider is already installed, which is fine.
    let _ = rustls::crypto::ring::default_provider().install_default();
}
