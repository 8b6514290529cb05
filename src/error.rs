// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    connection::ProfileError, fabric::FabricError, identity::IdentityError,
    storage::StorageError,
};

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

/// Body of every error response.
#[derive(Serialize, ToSchema)]
pub struct ErrorBody {
    pub error: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn bad_gateway(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_GATEWAY, message)
    }

    pub fn gateway_timeout(message: impl Into<String>) -> Self {
        Self::new(StatusCode::GATEWAY_TIMEOUT, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorBody {
            error: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<StorageError> for ApiError {
    fn from(e: StorageError) -> Self {
        ApiError::internal(format!("Failed to read the wallet: {e}"))
    }
}

impl From<ProfileError> for ApiError {
    fn from(e: ProfileError) -> Self {
        ApiError::internal(format!("Invalid connection profile: {e}"))
    }
}

impl From<IdentityError> for ApiError {
    fn from(e: IdentityError) -> Self {
        ApiError::internal(format!("Stored identity is unusable: {e}"))
    }
}

impl From<FabricError> for ApiError {
    fn from(e: FabricError) -> Self {
        match e {
            FabricError::Profile(inner) => inner.into(),
            FabricError::Timeout(_) => ApiError::gateway_timeout(e.to_string()),
            FabricError::Transport(_)
            | FabricError::Ca { .. }
            | FabricError::Endorsement(_)
            | FabricError::Commit { .. } => ApiError::bad_gateway(e.to_string()),
            FabricError::InvalidUrl(_)
            | FabricError::Tls(_)
            | FabricError::InvalidCredentials(_)
            | FabricError::Encoding(_) => ApiError::internal(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use std::time::Duration;

    #[test]
    fn constructors_set_status_and_message() {
        let nf = ApiError::not_found("missing");
        assert_eq!(nf.status, StatusCode::NOT_FOUND);
        assert_eq!(nf.message, "missing");

        let internal = ApiError::internal("broken");
        assert_eq!(internal.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(internal.message, "broken");

        let upstream = ApiError::bad_gateway("peer down");
        assert_eq!(upstream.status, StatusCode::BAD_GATEWAY);
        assert_eq!(upstream.message, "peer down");
    }

    #[tokio::test]
    async fn into_response_returns_json_body() {
        let response = ApiError::not_found("no identity").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body_bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = String::from_utf8(body_bytes.to_vec()).unwrap();
        assert_eq!(body, r#"{"error":"no identity"}"#);
    }

    #[test]
    fn network_failures_are_bad_gateway() {
        let err: ApiError = FabricError::Transport("connection refused".into()).into();
        assert_eq!(err.status, StatusCode::BAD_GATEWAY);

        let err: ApiError = FabricError::Endorsement("car exists".into()).into();
        assert_eq!(err.status, StatusCode::BAD_GATEWAY);
        assert!(err.message.contains("car exists"));

        let err: ApiError = FabricError::Commit {
            transaction_id: "abc".into(),
            code: 11,
        }
        .into();
        assert_eq!(err.status, StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn timeouts_are_gateway_timeout() {
        let err: ApiError = FabricError::Timeout(Duration::from_secs(30)).into();
        assert_eq!(err.status, StatusCode::GATEWAY_TIMEOUT);
    }

    #[test]
    fn local_configuration_errors_are_internal() {
        let err: ApiError = ProfileError::NoPeers("Org1MSP".into()).into();
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);

        let err: ApiError = FabricError::Profile(ProfileError::NoPeers("Org1MSP".into())).into();
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);

        let err: ApiError = StorageError::InvalidLabel("../x".into()).into();
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
