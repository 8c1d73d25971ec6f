// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Matricula Gateway

//! Orchestrator client — the relational system of record.
//!
//! Covers credential exchange, account/profile operations, property metadata
//! and transfer bookkeeping. All calls share the Orchestrator's (short)
//! timeout; a credential is forwarded only where the upstream requires
//! caller context.

use std::time::Duration;

use serde_json::Value;

use super::{ServiceCaller, UpstreamError};
use crate::models::{LoginUpstream, RegistryProperty, RegistryTransfer, UserAccount};

const SERVICE_NAME: &str = "Orchestrator";

/// Typed caller for the Orchestrator service.
#[derive(Debug, Clone)]
pub struct OrchestratorClient {
    caller: ServiceCaller,
}

impl OrchestratorClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, UpstreamError> {
        Ok(Self {
            caller: ServiceCaller::new(SERVICE_NAME, base_url, timeout)?,
        })
    }

    /// Exchange credentials for a bearer token plus the account record.
    pub async fn login(&self, body: &Value) -> Result<LoginUpstream, UpstreamError> {
        self.caller.post_json("/auth/login", None, body).await
    }

    /// Create a new account. The upstream response is relayed verbatim.
    pub async fn register_user(&self, body: &Value) -> Result<Value, UpstreamError> {
        self.caller.post_json("/auth/register", None, body).await
    }

    /// Link or replace the caller's wallet address.
    pub async fn update_wallet(&self, token: &str, body: &Value) -> Result<Value, UpstreamError> {
        self.caller.put_json("/users/wallet", Some(token), body).await
    }

    /// Fetch the caller's account profile.
    pub async fn me(&self, token: &str) -> Result<UserAccount, UpstreamError> {
        self.caller.get_json("/users/me", Some(token)).await
    }

    /// List properties owned by the caller.
    pub async fn my_properties(&self, token: &str) -> Result<Vec<RegistryProperty>, UpstreamError> {
        self.caller.get_json("/properties/my", Some(token)).await
    }

    /// Fetch property metadata by matrícula ID.
    pub async fn property_by_matricula(
        &self,
        matricula_id: &str,
    ) -> Result<RegistryProperty, UpstreamError> {
        self.caller
            .get_json(&format!("/properties/{matricula_id}"), None)
            .await
    }

    /// Register a new property record.
    pub async fn register_property(
        &self,
        token: &str,
        body: &Value,
    ) -> Result<Value, UpstreamError> {
        self.caller.post_json("/properties", Some(token), body).await
    }

    /// Fetch transfer bookkeeping by transfer ID.
    pub async fn transfer_by_id(
        &self,
        transfer_id: &str,
    ) -> Result<RegistryTransfer, UpstreamError> {
        self.caller
            .get_json(&format!("/transfers/{transfer_id}"), None)
            .await
    }

    /// List all transfers visible to the caller.
    pub async fn all_transfers(&self, token: &str) -> Result<Vec<RegistryTransfer>, UpstreamError> {
        self.caller.get_json("/transfers", Some(token)).await
    }

    /// Health probe.
    pub async fn health(&self) -> Result<(), UpstreamError> {
        let _: Value = self.caller.get_json("/health", None).await?;
        Ok(())
    }
}
