// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::connection::ConnectionProfile;
use crate::state::AppState;
use crate::storage::{FileStorage, IdentityRepository, StoragePaths};

/// Health check response with individual component status.
#[derive(Debug, Serialize, ToSchema)]
pub struct ReadyResponse {
    /// Overall health status ("ok" or "degraded").
    pub status: String,
    /// Individual health checks and their results.
    pub checks: HealthChecks,
}

/// Individual health check results.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthChecks {
    /// Whether the service process is running.
    pub service: String,
    /// Connection profile readable and parseable.
    pub connection_profile: String,
    /// Wallet directory readable and holding the application identity.
    pub wallet: String,
}

/// Simple health check response for liveness checks.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

fn check_connection_profile(state: &AppState) -> String {
    match ConnectionProfile::load(&state.settings.connection_profile) {
        Ok(_) => "ok".to_string(),
        Err(e) => {
            tracing::warn!(error = %e, "connection profile check failed");
            "unavailable".to_string()
        }
    }
}

/// Read-only: the gateway never writes to the wallet.
fn check_wallet(state: &AppState) -> String {
    let wallet_dir = &state.settings.wallet_dir;
    if !wallet_dir.is_dir() {
        return "missing".to_string();
    }

    let storage = FileStorage::unopened(StoragePaths::new(wallet_dir));
    match IdentityRepository::new(&storage).list() {
        Ok(labels) if labels.contains(&state.settings.app_user) => "ok".to_string(),
        Ok(_) => "no-identity".to_string(),
        Err(e) => {
            tracing::warn!(error = %e, "wallet check failed");
            "unavailable".to_string()
        }
    }
}

/// Health check endpoint handler.
///
/// Returns 200 if all checks pass, 503 if any check fails.
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service is healthy", body = ReadyResponse),
        (status = 503, description = "Service is unhealthy", body = ReadyResponse)
    )
)]
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<ReadyResponse>) {
    let connection_profile = check_connection_profile(&state);
    let wallet = check_wallet(&state);
    let all_ok = connection_profile == "ok" && wallet == "ok";

    let response = ReadyResponse {
        status: if all_ok { "ok" } else { "degraded" }.to_string(),
        checks: HealthChecks {
            service: "ok".to_string(),
            connection_profile,
            wallet,
        },
    };

    let status = if all_ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(response))
}

/// Liveness check handler.
///
/// Always returns 200 if the process is running.
#[utoipa::path(
    get,
    path = "/health/live",
    tag = "Health",
    responses(
        (status = 200, description = "Service is alive", body = HealthResponse)
    )
)]
pub async fn liveness() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

/// Readiness check handler.
///
/// Returns 200 only if the profile and wallet are available.
#[utoipa::path(
    get,
    path = "/health/ready",
    tag = "Health",
    responses(
        (status = 200, description = "Service is ready", body = ReadyResponse),
        (status = 503, description = "Service is not ready", body = ReadyResponse)
    )
)]
pub async fn readiness(state: State<AppState>) -> (StatusCode, Json<ReadyResponse>) {
    health(state).await
}
