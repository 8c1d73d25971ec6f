// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Matricula Gateway

//! # Wire Data Models
//!
//! Explicit schemas for the two upstream payload families and the merged
//! view models the gateway returns. All records are request-scoped; nothing
//! here is persisted.
//!
//! ## Merge Semantics
//!
//! The matrícula ID is the join key between the registry (Orchestrator) and
//! the chain (Offchain API). Merging is a pure function over two well-typed
//! records:
//!
//! - **Properties**: the registry is the system of record for existence; the
//!   chain record is authoritative enrichment. A missing chain record never
//!   fails the merge — chain fields default (`status: "pending"`,
//!   `isFrozen: false`, nulls).
//! - **Transfers**: when both sources report `status`/`approvals`, the chain
//!   value wins (it is the ledger state); registry values are the fallback.
//!
//! Registry field names are translated to the client-facing contract here and
//! nowhere else (`proprietario` → `ownerWalletAddress`, `tipo` →
//! `propertyType`, `isRegular` → `regularStatus`).

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Chain-side status reported for a property with no on-chain record yet.
pub const CHAIN_STATUS_PENDING: &str = "pending";

// =============================================================================
// Registry (Orchestrator) records
// =============================================================================

/// Property record as stored by the Orchestrator.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegistryProperty {
    /// Canonical property identifier (11-digit registry number).
    pub matricula_id: String,
    #[serde(default)]
    pub folha: Option<String>,
    #[serde(default)]
    pub comarca: Option<String>,
    #[serde(default)]
    pub endereco: Option<String>,
    #[serde(default)]
    pub metragem: Option<f64>,
    /// Wallet address of the recorded owner.
    #[serde(default)]
    pub proprietario: Option<String>,
    #[serde(default)]
    pub tipo: Option<String>,
    #[serde(default)]
    pub is_regular: Option<bool>,
    /// Matrícula this record was derived from, if any.
    #[serde(default)]
    pub matricula_origem: Option<String>,
    /// Hash of the transaction that tokenized this property.
    #[serde(default)]
    pub blockchain_tx_hash: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Transfer record as stored by the Orchestrator.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegistryTransfer {
    pub transfer_id: String,
    #[serde(default)]
    pub matricula_id: Option<String>,
    #[serde(default)]
    pub seller: Option<String>,
    #[serde(default)]
    pub buyer: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    /// Approver wallets that have signed off so far.
    #[serde(default)]
    pub approvals: Option<Vec<String>>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// User account payload relayed from the Orchestrator.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserAccount {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub cpf: Option<String>,
    pub wallet_address: Option<String>,
    pub role: String,
    pub active: bool,
    pub created_at: Option<String>,
}

/// Flat credential-exchange payload as the Orchestrator returns it.
///
/// The gateway reshapes this into [`LoginResponse`] (token + nested user).
#[derive(Debug, Clone, Deserialize)]
pub struct LoginUpstream {
    pub token: String,
    #[serde(flatten)]
    pub user: UserAccount,
}

/// Credential-exchange response shape returned to the client.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserAccount,
}

impl From<LoginUpstream> for LoginResponse {
    fn from(upstream: LoginUpstream) -> Self {
        Self {
            token: upstream.token,
            user: upstream.user,
        }
    }
}

// =============================================================================
// Chain (Offchain API) records
// =============================================================================

/// On-chain state of a tokenized property.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChainProperty {
    /// Wallet currently holding the property token.
    #[serde(default)]
    pub owner_wallet: Option<String>,
    #[serde(default)]
    pub token_id: Option<u64>,
    #[serde(default)]
    pub tx_hash: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub is_frozen: Option<bool>,
}

/// On-chain state of a transfer.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChainTransfer {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub approvals: Option<Vec<String>>,
    #[serde(default)]
    pub buyer_accepted: Option<bool>,
}

// =============================================================================
// Merged view models
// =============================================================================

/// Full property view: registry metadata plus on-chain enrichment.
///
/// The chain half is best-effort. When the chain lookup fails or the record
/// does not exist yet, the registry fields are still returned and the chain
/// fields carry their documented defaults.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PropertyView {
    pub matricula_id: String,
    pub folha: Option<String>,
    pub comarca: Option<String>,
    pub endereco: Option<String>,
    pub metragem: Option<f64>,
    /// Recorded owner wallet (registry `proprietario`).
    pub owner_wallet_address: Option<String>,
    /// Property classification (registry `tipo`).
    pub property_type: Option<String>,
    /// Regularization flag (registry `isRegular`).
    pub regular_status: Option<bool>,
    pub matricula_origem: Option<String>,
    pub blockchain_tx_hash: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    /// Wallet holding the token on chain, when known.
    pub owner_wallet: Option<String>,
    pub token_id: Option<u64>,
    pub tx_hash: Option<String>,
    /// On-chain status; `"pending"` when no chain record is available.
    pub status: String,
    /// Frozen flag; `false` when no chain record is available.
    pub is_frozen: bool,
}

impl PropertyView {
    /// Merge a registry record with an optional chain record.
    ///
    /// Never fails: an absent chain side yields the registry fields with
    /// chain fields defaulted.
    pub fn merge(db: RegistryProperty, chain: Option<ChainProperty>) -> Self {
        let chain = chain.unwrap_or_default();
        Self {
            matricula_id: db.matricula_id,
            folha: db.folha,
            comarca: db.comarca,
            endereco: db.endereco,
            metragem: db.metragem,
            owner_wallet_address: db.proprietario,
            property_type: db.tipo,
            regular_status: db.is_regular,
            matricula_origem: db.matricula_origem,
            blockchain_tx_hash: db.blockchain_tx_hash,
            created_at: db.created_at,
            updated_at: db.updated_at,
            owner_wallet: chain.owner_wallet,
            token_id: chain.token_id,
            tx_hash: chain.tx_hash,
            status: chain
                .status
                .unwrap_or_else(|| CHAIN_STATUS_PENDING.to_string()),
            is_frozen: chain.is_frozen.unwrap_or(false),
        }
    }
}

/// Merged transfer status view.
///
/// `status` and `approvals` prefer the chain values when present — the
/// ledger is authoritative for transfer progress — falling back to the
/// registry bookkeeping otherwise.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransferStatusView {
    pub transfer_id: String,
    pub matricula_id: Option<String>,
    pub seller: Option<String>,
    pub buyer: Option<String>,
    pub status: Option<String>,
    pub approvals: Vec<String>,
    pub buyer_accepted: Option<bool>,
    pub created_at: Option<String>,
    /// Whether on-chain data contributed to this view.
    pub on_chain: bool,
}

impl TransferStatusView {
    /// Merge a registry transfer with an optional chain record.
    pub fn merge(db: RegistryTransfer, chain: Option<ChainTransfer>) -> Self {
        let on_chain = chain.is_some();
        let chain = chain.unwrap_or_default();
        Self {
            transfer_id: db.transfer_id,
            matricula_id: db.matricula_id,
            seller: db.seller,
            buyer: db.buyer,
            status: chain.status.or(db.status),
            approvals: chain.approvals.or(db.approvals).unwrap_or_default(),
            buyer_accepted: chain.buyer_accepted,
            created_at: db.created_at,
            on_chain,
        }
    }

    /// Build a view from chain data alone. Used when the transfer exists on
    /// chain before any registry record of it is created.
    pub fn from_chain(transfer_id: impl Into<String>, chain: ChainTransfer) -> Self {
        Self {
            transfer_id: transfer_id.into(),
            matricula_id: None,
            seller: None,
            buyer: None,
            status: chain.status,
            approvals: chain.approvals.unwrap_or_default(),
            buyer_accepted: chain.buyer_accepted,
            created_at: None,
            on_chain: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry_property() -> RegistryProperty {
        RegistryProperty {
            matricula_id: "12345678901".to_string(),
            folha: Some("42".to_string()),
            comarca: Some("São Paulo".to_string()),
            endereco: Some("Rua Exemplo, 100".to_string()),
            metragem: Some(250.0),
            proprietario: Some("0x1111111111111111111111111111111111111111".to_string()),
            tipo: Some("URBANO".to_string()),
            is_regular: Some(true),
            matricula_origem: None,
            blockchain_tx_hash: Some("0xdeadbeef".to_string()),
            created_at: Some("2024-01-01".to_string()),
            updated_at: None,
        }
    }

    #[test]
    fn property_merge_without_chain_uses_defaults() {
        let view = PropertyView::merge(registry_property(), None);
        assert_eq!(view.status, "pending");
        assert!(!view.is_frozen);
        assert!(view.owner_wallet.is_none());
        assert!(view.token_id.is_none());
        // Registry side survives untouched.
        assert_eq!(view.matricula_id, "12345678901");
        assert_eq!(view.metragem, Some(250.0));
    }

    #[test]
    fn property_merge_translates_registry_field_names() {
        let view = PropertyView::merge(registry_property(), None);
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(
            json["ownerWalletAddress"],
            "0x1111111111111111111111111111111111111111"
        );
        assert_eq!(json["propertyType"], "URBANO");
        assert_eq!(json["regularStatus"], true);
        // Source-of-record names must not leak through.
        assert!(json.get("proprietario").is_none());
        assert!(json.get("tipo").is_none());
        assert!(json.get("isRegular").is_none());
    }

    #[test]
    fn property_merge_carries_chain_fields_when_present() {
        let chain = ChainProperty {
            owner_wallet: Some("0x2222222222222222222222222222222222222222".to_string()),
            token_id: Some(7),
            tx_hash: Some("0xfeed".to_string()),
            status: Some("tokenized".to_string()),
            is_frozen: Some(true),
        };
        let view = PropertyView::merge(registry_property(), Some(chain));
        assert_eq!(view.status, "tokenized");
        assert!(view.is_frozen);
        assert_eq!(view.token_id, Some(7));
    }

    fn registry_transfer() -> RegistryTransfer {
        RegistryTransfer {
            transfer_id: "tr-1".to_string(),
            matricula_id: Some("12345678901".to_string()),
            seller: Some("0x1111111111111111111111111111111111111111".to_string()),
            buyer: Some("0x2222222222222222222222222222222222222222".to_string()),
            status: Some("PENDING_APPROVAL".to_string()),
            approvals: Some(vec![]),
            created_at: Some("2024-02-02".to_string()),
        }
    }

    #[test]
    fn transfer_merge_prefers_chain_status_and_approvals() {
        let chain = ChainTransfer {
            status: Some("APPROVED".to_string()),
            approvals: Some(vec![
                "0x3333333333333333333333333333333333333333".to_string(),
            ]),
            buyer_accepted: Some(true),
        };
        let view = TransferStatusView::merge(registry_transfer(), Some(chain));
        assert_eq!(view.status.as_deref(), Some("APPROVED"));
        assert_eq!(view.approvals.len(), 1);
        assert_eq!(view.buyer_accepted, Some(true));
        assert!(view.on_chain);
        // Registry-only context is preserved.
        assert_eq!(view.matricula_id.as_deref(), Some("12345678901"));
    }

    #[test]
    fn transfer_merge_falls_back_to_registry_when_chain_absent() {
        let view = TransferStatusView::merge(registry_transfer(), None);
        assert_eq!(view.status.as_deref(), Some("PENDING_APPROVAL"));
        assert!(view.approvals.is_empty());
        assert!(!view.on_chain);
    }

    #[test]
    fn transfer_from_chain_has_no_registry_fields() {
        let chain = ChainTransfer {
            status: Some("EXECUTED".to_string()),
            approvals: None,
            buyer_accepted: Some(true),
        };
        let view = TransferStatusView::from_chain("tr-9", chain);
        assert_eq!(view.transfer_id, "tr-9");
        assert!(view.seller.is_none());
        assert!(view.matricula_id.is_none());
        assert_eq!(view.status.as_deref(), Some("EXECUTED"));
        assert!(view.on_chain);
    }

    #[test]
    fn login_upstream_flattens_and_reshapes() {
        let raw = serde_json::json!({
            "token": "t",
            "id": 1,
            "name": "A",
            "email": "a@b.com",
            "cpf": null,
            "walletAddress": null,
            "role": "USER",
            "active": true,
            "createdAt": "2024-01-01"
        });
        let upstream: LoginUpstream = serde_json::from_value(raw).unwrap();
        let response = LoginResponse::from(upstream);
        assert_eq!(response.token, "t");
        assert_eq!(response.user.id, 1);
        assert_eq!(response.user.email, "a@b.com");
        assert!(response.user.wallet_address.is_none());

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["user"]["createdAt"], "2024-01-01");
        assert_eq!(json["user"]["role"], "USER");
    }
}
