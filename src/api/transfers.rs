// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Matricula Gateway

//! Transfer endpoints.
//!
//! Initiation carries the gateway's only real business rules (ownership
//! check, buyer identity auto-registration, approver fallback). Approval,
//! acceptance, and execution are pure proxies over the Offchain API. Status
//! merges both sources, with a chain-only fallback when the registry has no
//! record yet.

use std::collections::HashSet;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

use super::properties::PROPERTY_CACHE_PREFIX;
use crate::{
    auth::{Auth, BearerToken},
    error::ApiError,
    models::{RegistryTransfer, TransferStatusView},
    state::AppState,
    validate::Validator,
};

/// Substituted when the approver registry is empty or unreachable, so the
/// transfer flow stays available at the cost of a potentially stale default.
const FALLBACK_APPROVER: &str = "0x4fD1cA1a6D8D6e4C90b2f8E3a5c7B9d0E2F41366";

/// Configure a new transfer on chain.
///
/// Rules enforced before anything is written:
/// - the caller must have a wallet linked (400 otherwise);
/// - that wallet must match the property's recorded owner,
///   case-insensitively (403 otherwise);
/// - the buyer's on-chain identity is registered automatically when absent,
///   and a failed registration aborts the whole request (500).
///
/// There is no compensation if the identity registers but the configure call
/// then fails; the error is surfaced as-is.
#[utoipa::path(
    post,
    path = "/transfers/initiate",
    tag = "Transfers",
    security(("bearer" = [])),
    responses(
        (status = 201, description = "Transfer configured"),
        (status = 400, description = "Validation failed or no wallet linked"),
        (status = 403, description = "Caller is not the recorded property owner"),
        (status = 500, description = "Buyer identity registration failed"),
        (status = 503, description = "An upstream is unavailable")
    )
)]
pub async fn initiate_transfer(
    Auth(_user): Auth,
    BearerToken(token): BearerToken,
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let mut v = Validator::new();
    v.matricula(&body, "matriculaId");
    v.wallet(&body, "buyerWallet");
    v.finish()?;

    // Validated just above.
    let matricula_id = body["matriculaId"].as_str().unwrap_or_default().to_string();
    let buyer_wallet = body["buyerWallet"].as_str().unwrap_or_default().to_string();

    let account = state.orchestrator.me(&token).await?;
    let caller_wallet = account.wallet_address.ok_or_else(|| {
        ApiError::bad_request(
            "No wallet address linked to your account. Link a wallet before initiating a transfer.",
        )
    })?;

    let property = state
        .orchestrator
        .property_by_matricula(&matricula_id)
        .await?;
    let owner_matches = property
        .proprietario
        .as_deref()
        .is_some_and(|owner| owner.eq_ignore_ascii_case(&caller_wallet));
    if !owner_matches {
        return Err(ApiError::forbidden(
            "Only the recorded property owner can initiate a transfer",
        ));
    }

    ensure_buyer_identity(&state, &buyer_wallet).await?;
    let approvers = resolve_approvers(&state).await;

    let payload = json!({
        "matriculaId": matricula_id,
        "sellerWallet": caller_wallet,
        "buyerWallet": buyer_wallet,
        "approvers": approvers,
    });
    let configured = state.offchain.initiate_transfer(&token, &payload).await?;
    Ok((StatusCode::CREATED, Json(configured)))
}

/// Record an approver's sign-off. Pure proxy.
#[utoipa::path(
    post,
    path = "/transfers/approve",
    tag = "Transfers",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Approval recorded"),
        (status = 401, description = "Missing or invalid token")
    )
)]
pub async fn approve_transfer(
    Auth(_user): Auth,
    BearerToken(token): BearerToken,
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    require_transfer_id(&body)?;
    let result = state.offchain.approve_transfer(&token, &body).await?;
    Ok(Json(result))
}

/// Record the buyer's acceptance. Pure proxy.
#[utoipa::path(
    post,
    path = "/transfers/accept",
    tag = "Transfers",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Acceptance recorded"),
        (status = 401, description = "Missing or invalid token")
    )
)]
pub async fn accept_transfer(
    Auth(_user): Auth,
    BearerToken(token): BearerToken,
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    require_transfer_id(&body)?;
    let result = state.offchain.accept_transfer(&token, &body).await?;
    Ok(Json(result))
}

/// Execute a fully-approved transfer. Pure proxy; drops cached property
/// views since ownership may have changed.
#[utoipa::path(
    post,
    path = "/transfers/execute",
    tag = "Transfers",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Transfer executed"),
        (status = 401, description = "Missing or invalid token")
    )
)]
pub async fn execute_transfer(
    Auth(_user): Auth,
    BearerToken(token): BearerToken,
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    require_transfer_id(&body)?;
    let result = state.offchain.execute_transfer(&token, &body).await?;
    state.cache.invalidate_prefix(PROPERTY_CACHE_PREFIX);
    Ok(Json(result))
}

/// Merged status for one transfer.
///
/// The registry record is primary; the chain record wins for
/// `status`/`approvals` when present. A registry 404 falls back to the
/// chain-only view — a transfer can exist on chain before any registry
/// bookkeeping is created for it.
#[utoipa::path(
    get,
    path = "/transfers/{transfer_id}/status",
    tag = "Transfers",
    params(("transfer_id" = String, Path, description = "Transfer ID")),
    responses(
        (status = 200, description = "Merged transfer status", body = TransferStatusView),
        (status = 404, description = "Unknown on both sources"),
        (status = 503, description = "An upstream is unavailable")
    )
)]
pub async fn transfer_status(
    Path(transfer_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<TransferStatusView>, ApiError> {
    match state.orchestrator.transfer_by_id(&transfer_id).await {
        Ok(registry) => {
            let chain = match state.offchain.transfer_onchain(&transfer_id).await {
                Ok(chain) => Some(chain),
                Err(e) => {
                    tracing::warn!(
                        transfer_id = %transfer_id,
                        error = %e,
                        "chain status unavailable; serving registry status"
                    );
                    None
                }
            };
            Ok(Json(TransferStatusView::merge(registry, chain)))
        }
        Err(e) if e.is_not_found() => {
            let chain = state.offchain.transfer_onchain(&transfer_id).await?;
            Ok(Json(TransferStatusView::from_chain(transfer_id, chain)))
        }
        Err(e) => Err(e.into()),
    }
}

/// List transfers involving the caller's properties.
#[utoipa::path(
    get,
    path = "/transfers/my",
    tag = "Transfers",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Transfers touching the caller's matrículas", body = [RegistryTransfer]),
        (status = 401, description = "Missing or invalid token"),
        (status = 503, description = "Orchestrator unavailable")
    )
)]
pub async fn my_transfers(
    Auth(_user): Auth,
    BearerToken(token): BearerToken,
    State(state): State<AppState>,
) -> Result<Json<Vec<RegistryTransfer>>, ApiError> {
    let (properties, transfers) = tokio::join!(
        state.orchestrator.my_properties(&token),
        state.orchestrator.all_transfers(&token),
    );
    let properties = properties?;
    let transfers = transfers?;

    let owned: HashSet<&str> = properties.iter().map(|p| p.matricula_id.as_str()).collect();
    let mine = transfers
        .into_iter()
        .filter(|t| {
            t.matricula_id
                .as_deref()
                .is_some_and(|id| owned.contains(id))
        })
        .collect();

    Ok(Json(mine))
}

fn require_transfer_id(body: &Value) -> Result<(), ApiError> {
    let mut v = Validator::new();
    v.require(body, "transferId");
    v.finish()
}

/// Register the buyer's on-chain identity when it does not exist yet.
///
/// A lookup 404 means "not registered". Registration is idempotent at the
/// client layer — an upstream "already registered" rejection is success —
/// but an actual registration failure aborts the transfer with a 500.
async fn ensure_buyer_identity(state: &AppState, buyer_wallet: &str) -> Result<(), ApiError> {
    let registered = match state.offchain.identity(buyer_wallet).await {
        Ok(record) => record.registered,
        Err(e) if e.is_not_found() => false,
        Err(e) => return Err(e.into()),
    };
    if registered {
        return Ok(());
    }

    let registration = state
        .offchain
        .register_identity(buyer_wallet)
        .await
        .map_err(|e| ApiError::internal(format!("buyer identity registration failed: {e}")))?;
    if registration.already_registered {
        tracing::debug!(wallet = buyer_wallet, "buyer identity was already registered");
    }
    Ok(())
}

/// Fetch the active approver set, substituting the fixed fallback when the
/// registry is empty or unreachable.
async fn resolve_approvers(state: &AppState) -> Vec<String> {
    match state.offchain.active_approvers().await {
        Ok(approvers) if !approvers.is_empty() => approvers,
        Ok(_) => {
            tracing::warn!("approver registry returned an empty set; using fallback approver");
            vec![FALLBACK_APPROVER.to_string()]
        }
        Err(e) => {
            tracing::warn!(error = %e, "approver registry unavailable; using fallback approver");
            vec![FALLBACK_APPROVER.to_string()]
        }
    }
}
