// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Matricula Gateway

//! Offchain API client — the ledger-facing upstream.
//!
//! Reads and writes on-chain state for properties, transfers, and wallet
//! identities. Chain operations are slow, so this client carries a much
//! longer timeout than the Orchestrator's.

use std::time::Duration;

use serde::Deserialize;
use serde_json::{json, Value};

use super::{ServiceCaller, UpstreamError};
use crate::models::{ChainProperty, ChainTransfer};

const SERVICE_NAME: &str = "Offchain API";

/// Outcome of an identity registration attempt.
///
/// Registering a wallet that is already registered is not an error: the
/// upstream's "already registered" rejection is folded into
/// `already_registered: true` so callers can treat the step as idempotent.
#[derive(Debug, Clone)]
pub struct IdentityRegistration {
    pub wallet_address: String,
    pub already_registered: bool,
}

/// On-chain identity record.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityRecord {
    #[serde(default)]
    pub wallet_address: Option<String>,
    #[serde(default)]
    pub registered: bool,
}

/// Active approver set reported by the approver registry.
#[derive(Debug, Clone, Deserialize)]
pub struct ApproverSet {
    #[serde(default)]
    pub approvers: Vec<String>,
}

/// Typed caller for the Offchain API.
#[derive(Debug, Clone)]
pub struct OffchainClient {
    caller: ServiceCaller,
}

impl OffchainClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, UpstreamError> {
        Ok(Self {
            caller: ServiceCaller::new(SERVICE_NAME, base_url, timeout)?,
        })
    }

    /// Fetch the on-chain record for a property.
    pub async fn property_onchain(
        &self,
        matricula_id: &str,
    ) -> Result<ChainProperty, UpstreamError> {
        self.caller
            .get_json(&format!("/properties/{matricula_id}"), None)
            .await
    }

    /// List tokenized properties held by a wallet. Relayed verbatim.
    pub async fn properties_by_wallet(&self, wallet: &str) -> Result<Value, UpstreamError> {
        self.caller
            .get_json(&format!("/properties/owner/{wallet}"), None)
            .await
    }

    /// Fetch the on-chain record for a transfer.
    pub async fn transfer_onchain(
        &self,
        transfer_id: &str,
    ) -> Result<ChainTransfer, UpstreamError> {
        self.caller
            .get_json(&format!("/transfers/{transfer_id}"), None)
            .await
    }

    /// Configure a new transfer on chain.
    pub async fn initiate_transfer(
        &self,
        token: &str,
        body: &Value,
    ) -> Result<Value, UpstreamError> {
        self.caller
            .post_json("/transfers/initiate", Some(token), body)
            .await
    }

    /// Record an approver's sign-off.
    pub async fn approve_transfer(
        &self,
        token: &str,
        body: &Value,
    ) -> Result<Value, UpstreamError> {
        self.caller
            .post_json("/transfers/approve", Some(token), body)
            .await
    }

    /// Record the buyer's acceptance.
    pub async fn accept_transfer(
        &self,
        token: &str,
        body: &Value,
    ) -> Result<Value, UpstreamError> {
        self.caller
            .post_json("/transfers/accept", Some(token), body)
            .await
    }

    /// Execute a fully-approved transfer.
    pub async fn execute_transfer(
        &self,
        token: &str,
        body: &Value,
    ) -> Result<Value, UpstreamError> {
        self.caller
            .post_json("/transfers/execute", Some(token), body)
            .await
    }

    /// Look up the on-chain identity for a wallet.
    pub async fn identity(&self, wallet: &str) -> Result<IdentityRecord, UpstreamError> {
        self.caller
            .get_json(&format!("/identity/{wallet}"), None)
            .await
    }

    /// Register a wallet's on-chain identity.
    ///
    /// An upstream "already registered" rejection (or a 409) is success from
    /// the gateway's perspective; see [`IdentityRegistration`].
    pub async fn register_identity(
        &self,
        wallet: &str,
    ) -> Result<IdentityRegistration, UpstreamError> {
        let body = json!({ "walletAddress": wallet });
        let result: Result<Value, UpstreamError> = self
            .caller
            .post_json("/identity/register", None, &body)
            .await;

        match result {
            Ok(_) => Ok(IdentityRegistration {
                wallet_address: wallet.to_string(),
                already_registered: false,
            }),
            Err(UpstreamError::Response {
                status, message, ..
            }) if status == 409 || message.to_lowercase().contains("already registered") => {
                Ok(IdentityRegistration {
                    wallet_address: wallet.to_string(),
                    already_registered: true,
                })
            }
            Err(e) => Err(e),
        }
    }

    /// Fetch the currently active approver set.
    pub async fn active_approvers(&self) -> Result<Vec<String>, UpstreamError> {
        let set: ApproverSet = self.caller.get_json("/approvers/active", None).await?;
        Ok(set.approvers)
    }

    /// Health probe.
    pub async fn health(&self) -> Result<(), UpstreamError> {
        let _: Value = self.caller.get_json("/health", None).await?;
        Ok(())
    }
}
