// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

/// Errors that can occur while talking to the CA or the ledger network.
#[derive(Debug, thiserror::Error)]
pub enum FabricError {
    #[error(transparent)]
    Profile(#[from] crate::connection::ProfileError),

    #[error("Invalid endpoint URL: {0}")]
    InvalidUrl(String),

    #[error("TLS configuration error: {0}")]
    Tls(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Certificate authority error {code}: {message}")]
    Ca { code: i64, message: String },

    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    #[error("Encoding error: {0}")]
    Encoding(String),

    #[error("Endorsement failed: {0}")]
    Endorsement(String),

    #[error("Transaction {transaction_id} failed to commit with validation code {code}")]
    Commit { transaction_id: String, code: i32 },

    #[error("Ledger operation timed out after {0:?}")]
    Timeout(std::time::Duration),
}

impl FabricError {
    /// Map a gRPC status returned by the gateway peer.
    pub fn from_status(status: tonic::Status) -> Self {
        match status.code() {
            tonic::Code::Unavailable => FabricError::Transport(status.message().to_string()),
            _ => FabricError::Endorsement(format!("{:?}: {}", status.code(), status.message())),
        }
    }
}

impl From<reqwest::Error> for FabricError {
    fn from(e: reqwest::Error) -> Self {
        FabricError::Transport(e.to_string())
    }
}

impl From<tonic::transport::Error> for FabricError {
    fn from(e: tonic::transport::Error) -> Self {
        FabricError::Transport(e.to_string())
    }
}
