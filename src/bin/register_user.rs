// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Register the application user with the admin identity and import it into
//! the wallet.

use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};

use car_ledger_client::{
    config::RegisterArgs,
    enrollment::{run_register_user, EnrollOutcome},
    install_crypto_provider,
    telemetry::init_tracing,
};

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let args = RegisterArgs::parse();
    init_tracing(args.network.log_format);
    install_crypto_provider();

    match run_register_user(&args).await {
        Ok(EnrollOutcome::Enrolled) => {
            info!(principal = %args.app_user, "successfully registered and enrolled user and imported it into the wallet");
            ExitCode::SUCCESS
        }
        Ok(EnrollOutcome::AlreadyEnrolled) => {
            info!(principal = %args.app_user, "an identity for the user already exists in the wallet");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(principal = %args.app_user, "failed to register user: {e:#}");
            ExitCode::FAILURE
        }
    }
}
