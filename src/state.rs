// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::{config::GatewaySettings, fabric::LedgerConnector};

/// Shared, read-only state of the gateway. Each request opens its own ledger
/// session through `connector`; nothing here is mutated after startup.
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<GatewaySettings>,
    pub connector: Arc<dyn LedgerConnector>,
}

impl AppState {
    pub fn new(settings: GatewaySettings, connector: Arc<dyn LedgerConnector>) -> Self {
        Self {
            settings: Arc::new(settings),
            connector,
        }
    }
}
