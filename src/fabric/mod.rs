// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Hyperledger Fabric integration.
//!
//! The network is only reached through the traits below, so the enrollment
//! tools and HTTP handlers can be exercised against fakes:
//!
//! - [`CertificateAuthority`]: enroll and register principals
//!   (implemented by [`FabricCaClient`] over the CA REST API)
//! - [`LedgerConnector`] / [`LedgerSession`]: per-request sessions that
//!   evaluate or submit chaincode transactions (implemented by
//!   [`GrpcConnector`] over the Fabric Gateway gRPC service)

pub mod ca;
pub mod error;
pub mod gateway;
pub mod proposal;
pub mod protos;
pub mod signing;
pub mod types;

#[cfg(test)]
pub mod testing;

use async_trait::async_trait;

use crate::identity::X509Identity;

pub use ca::FabricCaClient;
pub use error::FabricError;
pub use gateway::GrpcConnector;
pub use types::*;

#[async_trait]
pub trait CertificateAuthority: Send + Sync {
    /// Obtain a certificate for `request.enrollment_id`.
    async fn enroll(&self, request: &EnrollmentRequest) -> Result<Enrollment, FabricError>;

    /// Register a new principal on behalf of `registrar`; returns its enrollment secret.
    async fn register(
        &self,
        registrar: &X509Identity,
        request: &RegistrationRequest,
    ) -> Result<String, FabricError>;
}

#[async_trait]
pub trait LedgerConnector: Send + Sync {
    /// Open a session bound to one identity, channel and contract.
    async fn connect(
        &self,
        request: SessionRequest<'_>,
    ) -> Result<Box<dyn LedgerSession>, FabricError>;
}

#[async_trait]
pub trait LedgerSession: Send + Sync {
    /// Run a read-only transaction and return its result payload.
    async fn evaluate(&self, function: &str, args: &[String]) -> Result<Vec<u8>, FabricError>;

    /// Endorse, order and wait for the commit of a transaction.
    async fn submit(&self, function: &str, args: &[String]) -> Result<SubmitReceipt, FabricError>;

    /// Release the connection.
    async fn close(self: Box<Self>);
}
