// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Enroll the CA administrator and import it into the wallet.

use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};

use car_ledger_client::{
    config::EnrollArgs,
    enrollment::{run_enroll_admin, EnrollOutcome},
    install_crypto_provider,
    telemetry::init_tracing,
};

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let args = EnrollArgs::parse();
    init_tracing(args.network.log_format);
    install_crypto_provider();

    match run_enroll_admin(&args).await {
        Ok(EnrollOutcome::Enrolled) => {
            info!(principal = %args.admin_id, "successfully enrolled admin user and imported it into the wallet");
            ExitCode::SUCCESS
        }
        Ok(EnrollOutcome::AlreadyEnrolled) => {
            info!(principal = %args.admin_id, "an identity for the admin user already exists in the wallet");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(principal = %args.admin_id, "failed to enroll admin user: {e:#}");
            ExitCode::FAILURE
        }
    }
}
