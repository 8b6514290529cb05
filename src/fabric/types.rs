// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Request and result types exchanged with the Fabric capability traits.

use std::fmt;

use crate::connection::ConnectionProfile;
use crate::identity::X509Identity;

/// Credentials presented to the CA's enroll endpoint.
#[derive(Clone)]
pub struct EnrollmentRequest {
    pub enrollment_id: String,
    pub secret: String,
}

impl EnrollmentRequest {
    pub fn new(enrollment_id: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            enrollment_id: enrollment_id.into(),
            secret: secret.into(),
        }
    }
}

impl fmt::Debug for EnrollmentRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnrollmentRequest")
            .field("enrollment_id", &self.enrollment_id)
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// Certificate issued by the CA plus the locally generated key it certifies.
#[derive(Clone)]
pub struct Enrollment {
    pub certificate: String,
    pub private_key: String,
}

impl fmt::Debug for Enrollment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Enrollment")
            .field("certificate", &self.certificate)
            .field("private_key", &"<redacted>")
            .finish()
    }
}

impl Enrollment {
    pub fn into_identity(self, msp_id: impl Into<String>) -> X509Identity {
        X509Identity::new(msp_id, self.certificate, self.private_key)
    }
}

/// A new principal to register with the CA.
#[derive(Debug, Clone)]
pub struct RegistrationRequest {
    pub enrollment_id: String,
    pub role: String,
    pub affiliation: String,
    /// Zero lets the CA apply its default limit.
    pub max_enrollments: i32,
}

impl RegistrationRequest {
    /// A `client` principal under `affiliation`.
    pub fn client(enrollment_id: impl Into<String>, affiliation: impl Into<String>) -> Self {
        Self {
            enrollment_id: enrollment_id.into(),
            role: "client".to_string(),
            affiliation: affiliation.into(),
            max_enrollments: 0,
        }
    }
}

/// How the session reaches and selects peers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiscoveryOptions {
    /// When false, endorsement is restricted to the client's own organisation.
    pub enabled: bool,
    /// Connect to `localhost` while verifying TLS against the peer's real name.
    pub as_localhost: bool,
}

impl Default for DiscoveryOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            as_localhost: true,
        }
    }
}

/// Everything needed to open one session.
#[derive(Debug, Clone, Copy)]
pub struct SessionRequest<'a> {
    pub profile: &'a ConnectionProfile,
    pub identity: &'a X509Identity,
    pub channel: &'a str,
    pub contract: &'a str,
    pub discovery: DiscoveryOptions,
}

/// Acknowledgement of a committed transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitReceipt {
    pub transaction_id: String,
    pub block_number: u64,
}
