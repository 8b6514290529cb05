// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Identity bootstrap: enroll the admin, register the application user.
//!
//! Both flows are idempotent. A principal that already has a wallet record is
//! left alone and the CA is not contacted.
//!
//! `run_enroll_admin` and `run_register_user` are the entry points of the two
//! command-line tools. They read the connection profile and open the wallet
//! before a CA client is built, so a bad profile or an unusable wallet fails
//! without any network traffic.

use tracing::info;

use crate::config::{EnrollArgs, NetworkArgs, RegisterArgs};
use crate::connection::{ConnectionProfile, ProfileError};
use crate::fabric::{
    CertificateAuthority, EnrollmentRequest, FabricCaClient, FabricError, RegistrationRequest,
};
use crate::storage::{FileStorage, IdentityRepository, StorageError, StoragePaths};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnrollOutcome {
    /// A new record was written.
    Enrolled,
    /// The principal already had a record; nothing changed.
    AlreadyEnrolled,
}

#[derive(Debug, thiserror::Error)]
pub enum EnrollError {
    #[error("Wallet error: {0}")]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Profile(#[from] ProfileError),

    #[error(transparent)]
    Fabric(#[from] FabricError),

    #[error(
        "An identity for the admin user \"{0}\" does not exist in the wallet; run enroll-admin before retrying"
    )]
    MissingRegistrar(String),
}

/// Enroll the admin principal named by `args` into the configured wallet.
pub async fn run_enroll_admin(args: &EnrollArgs) -> Result<EnrollOutcome, EnrollError> {
    let (ca, storage) = connect(&args.network)?;
    enroll_admin(
        &ca,
        &IdentityRepository::new(&storage),
        &EnrollmentRequest::new(&args.admin_id, &args.admin_secret),
        &args.network.msp_id,
    )
    .await
}

/// Register and enroll the application user named by `args`.
pub async fn run_register_user(args: &RegisterArgs) -> Result<EnrollOutcome, EnrollError> {
    let (ca, storage) = connect(&args.network)?;
    register_app_user(
        &ca,
        &IdentityRepository::new(&storage),
        &args.admin_id,
        &RegistrationRequest::client(&args.app_user, &args.affiliation),
        &args.network.msp_id,
    )
    .await
}

fn connect(network: &NetworkArgs) -> Result<(FabricCaClient, FileStorage), EnrollError> {
    let profile = ConnectionProfile::load(&network.connection_profile)?;
    let ca_config = profile.certificate_authority(&network.ca_name)?;

    let storage = FileStorage::open(StoragePaths::new(&network.wallet_dir))?;
    info!(wallet = %network.wallet_dir.display(), "wallet opened");

    let ca = FabricCaClient::from_profile(ca_config)?;
    Ok((ca, storage))
}

/// Enroll `request.enrollment_id` with the CA and store it under that label.
pub async fn enroll_admin(
    ca: &dyn CertificateAuthority,
    wallet: &IdentityRepository<'_>,
    request: &EnrollmentRequest,
    msp_id: &str,
) -> Result<EnrollOutcome, EnrollError> {
    let label = request.enrollment_id.as_str();
    if wallet.exists(label)? {
        info!(principal = label, "identity already exists in the wallet");
        return Ok(EnrollOutcome::AlreadyEnrolled);
    }

    let enrollment = ca.enroll(request).await?;
    store(wallet, label, enrollment.into_identity(msp_id))
}

/// Register and enroll an application principal using the `registrar` identity.
pub async fn register_app_user(
    ca: &dyn CertificateAuthority,
    wallet: &IdentityRepository<'_>,
    registrar: &str,
    registration: &RegistrationRequest,
    msp_id: &str,
) -> Result<EnrollOutcome, EnrollError> {
    let label = registration.enrollment_id.as_str();
    if wallet.exists(label)? {
        info!(principal = label, "identity already exists in the wallet");
        return Ok(EnrollOutcome::AlreadyEnrolled);
    }

    let admin = wallet
        .get(registrar)?
        .ok_or_else(|| EnrollError::MissingRegistrar(registrar.to_string()))?;

    let secret = ca.register(&admin, registration).await?;
    info!(principal = label, registrar, "registered with the certificate authority");

    let enrollment = ca
        .enroll(&EnrollmentRequest::new(label, secret))
        .await?;
    store(wallet, label, enrollment.into_identity(msp_id))
}

fn store(
    wallet: &IdentityRepository<'_>,
    label: &str,
    identity: crate::identity::X509Identity,
) -> Result<EnrollOutcome, EnrollError> {
    match wallet.put(label, &identity) {
        Ok(()) => {
            info!(principal = label, "enrolled and imported into the wallet");
            Ok(EnrollOutcome::Enrolled)
        }
        // Lost a race with another enrollment of the same principal.
        Err(StorageError::AlreadyExists(_)) => Ok(EnrollOutcome::AlreadyEnrolled),
        Err(e) => Err(e.into()),
    }
}
