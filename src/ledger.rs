// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Per-request ledger access.
//!
//! Every call walks the same lifecycle: load the connection profile, resolve
//! the application identity from the wallet, open a session, invoke one
//! transaction, close the session. Nothing is cached between requests. A
//! missing identity short-circuits before any session is opened; once a
//! session is open it is closed whether the invocation succeeded or not.

use tracing::{debug, warn};

use crate::{
    connection::ConnectionProfile,
    error::ApiError,
    fabric::{LedgerSession, SessionRequest, SubmitReceipt},
    identity::X509Identity,
    state::AppState,
    storage::{FileStorage, IdentityRepository, StoragePaths},
};

/// Run a read-only transaction and return its raw result.
pub async fn evaluate(
    state: &AppState,
    function: &str,
    args: &[String],
) -> Result<Vec<u8>, ApiError> {
    let session = open_session(state).await.inspect_err(|e| {
        warn!(function, status = %e.status, error = %e.message, "evaluate aborted");
    })?;

    let result = session.evaluate(function, args).await;
    session.close().await;

    result.map_err(|e| {
        warn!(function, error = %e, "evaluate failed");
        ApiError::from(e)
    })
}

/// Submit a transaction and wait for it to commit.
pub async fn submit(
    state: &AppState,
    function: &str,
    args: &[String],
) -> Result<SubmitReceipt, ApiError> {
    let session = open_session(state).await.inspect_err(|e| {
        warn!(function, status = %e.status, error = %e.message, "submit aborted");
    })?;

    let result = session.submit(function, args).await;
    session.close().await;

    match result {
        Ok(receipt) => {
            debug!(
                function,
                tx_id = %receipt.transaction_id,
                block = receipt.block_number,
                "transaction committed"
            );
            Ok(receipt)
        }
        Err(e) => {
            warn!(function, error = %e, "submit failed");
            Err(e.into())
        }
    }
}

async fn open_session(state: &AppState) -> Result<Box<dyn LedgerSession>, ApiError> {
    let settings = &state.settings;
    let profile = ConnectionProfile::load(&settings.connection_profile)?;
    let identity = resolve_identity(state)?;

    let session = state
        .connector
        .connect(SessionRequest {
            profile: &profile,
            identity: &identity,
            channel: &settings.channel,
            contract: &settings.contract,
            discovery: settings.discovery,
        })
        .await?;
    Ok(session)
}

fn resolve_identity(state: &AppState) -> Result<X509Identity, ApiError> {
    let label = state.settings.app_user.as_str();
    let storage = FileStorage::unopened(StoragePaths::new(&state.settings.wallet_dir));

    let identity = IdentityRepository::new(&storage)
        .get(label)?
        .ok_or_else(|| missing_identity(label))?;
    identity.validate()?;
    Ok(identity)
}

fn missing_identity(label: &str) -> ApiError {
    ApiError::not_found(format!(
        "An identity for the user \"{label}\" does not exist in the wallet; run register-user before retrying"
    ))
}
