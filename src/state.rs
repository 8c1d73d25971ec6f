// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Matricula Gateway

use std::sync::Arc;
use std::time::Duration;

use crate::cache::ResponseCache;
use crate::clients::{OffchainClient, OrchestratorClient, UpstreamError};
use crate::config::GatewayConfig;

/// Response cache sizing. Thirty seconds is long enough to absorb a burst of
/// identical property lookups and short enough that chain state staleness
/// stays within one block-confirmation window.
const RESPONSE_CACHE_CAPACITY: usize = 256;
const RESPONSE_CACHE_TTL: Duration = Duration::from_secs(30);

/// Shared handler dependencies. Cloned per request; everything inside is
/// either `Arc`'d or internally reference-counted.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<GatewayConfig>,
    pub orchestrator: OrchestratorClient,
    pub offchain: OffchainClient,
    pub cache: Arc<ResponseCache>,
}

impl AppState {
    pub fn new(config: GatewayConfig) -> Result<Self, UpstreamError> {
        let orchestrator = OrchestratorClient::new(
            config.orchestrator_base_url.clone(),
            config.orchestrator_timeout,
        )?;
        let offchain =
            OffchainClient::new(config.offchain_base_url.clone(), config.offchain_timeout)?;

        Ok(Self {
            config: Arc::new(config),
            orchestrator,
            offchain,
            cache: Arc::new(ResponseCache::new(
                RESPONSE_CACHE_CAPACITY,
                RESPONSE_CACHE_TTL,
            )),
        })
    }
}
