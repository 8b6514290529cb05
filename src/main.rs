// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;

use car_ledger_client::{
    api::router, config::GatewayArgs, fabric::GrpcConnector, install_crypto_provider,
    state::AppState, telemetry::init_tracing,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = GatewayArgs::parse();
    init_tracing(args.network.log_format);
    install_crypto_provider();

    let addr = args
        .bind_addr()
        .with_context(|| format!("invalid bind address {}:{}", args.host, args.port))?;

    let connector = GrpcConnector::new(args.ledger_timeout());
    let state = AppState::new(args.settings(), Arc::new(connector));
    let app = router(state);

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    info!(
        %addr,
        channel = %args.channel,
        contract = %args.contract,
        profile = %args.network.connection_profile.display(),
        "car gateway listening (docs at /docs)"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    info!("car gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
