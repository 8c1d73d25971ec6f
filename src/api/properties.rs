// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Matricula Gateway

//! Property endpoints.
//!
//! The registry (Orchestrator) is the system of record for property
//! existence; the chain (Offchain API) is authoritative enrichment. A failed
//! chain lookup degrades a response to registry-only data — it never turns a
//! found property into an error.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use futures::future::join_all;
use serde_json::Value;

use crate::{
    auth::{Auth, BearerToken, OptionalAuth},
    error::ApiError,
    models::{ChainProperty, PropertyView},
    state::AppState,
    validate::{self, Validator},
};

/// Cache namespace for property reads. Write paths invalidate this prefix.
pub(crate) const PROPERTY_CACHE_PREFIX: &str = "properties:";

/// List the caller's properties with per-item chain enrichment.
///
/// Enrichment calls run concurrently and settle independently: one bad
/// upstream record does not void the batch, it just comes back with chain
/// fields defaulted.
#[utoipa::path(
    get,
    path = "/properties/my",
    tag = "Properties",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Owned properties with on-chain state", body = [PropertyView]),
        (status = 401, description = "Missing or invalid token"),
        (status = 503, description = "Orchestrator unavailable")
    )
)]
pub async fn my_properties(
    Auth(_user): Auth,
    BearerToken(token): BearerToken,
    State(state): State<AppState>,
) -> Result<Json<Vec<PropertyView>>, ApiError> {
    let properties = state.orchestrator.my_properties(&token).await?;

    let views = join_all(properties.into_iter().map(|property| {
        let offchain = state.offchain.clone();
        async move {
            let chain = fetch_chain_best_effort(&offchain, &property.matricula_id).await;
            PropertyView::merge(property, chain)
        }
    }))
    .await;

    Ok(Json(views))
}

/// Full detail for one property: registry metadata plus on-chain record.
///
/// Anonymous route; a valid bearer token is noted for the access log but
/// never required.
#[utoipa::path(
    get,
    path = "/properties/{matricula_id}/full",
    tag = "Properties",
    params(("matricula_id" = String, Path, description = "Matrícula ID")),
    responses(
        (status = 200, description = "Merged property view", body = PropertyView),
        (status = 404, description = "No registry record for this matrícula"),
        (status = 503, description = "Orchestrator unavailable")
    )
)]
pub async fn property_full(
    OptionalAuth(caller): OptionalAuth,
    Path(matricula_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<Value>, ApiError> {
    if let Some(user) = &caller {
        tracing::debug!(user_id = %user.user_id, matricula_id = %matricula_id, "property detail lookup");
    }

    let cache_key = format!("{PROPERTY_CACHE_PREFIX}{matricula_id}:full");
    if let Some(cached) = state.cache.get(&cache_key) {
        return Ok(Json(cached));
    }

    // Registry is the system of record: a miss here fails the request.
    let registry = state
        .orchestrator
        .property_by_matricula(&matricula_id)
        .await?;
    let chain = fetch_chain_best_effort(&state.offchain, &matricula_id).await;

    let view = PropertyView::merge(registry, chain);
    let body = serde_json::to_value(&view).map_err(ApiError::internal)?;
    state.cache.put(cache_key, body.clone());
    Ok(Json(body))
}

/// Register a new property record.
#[utoipa::path(
    post,
    path = "/properties/register",
    tag = "Properties",
    security(("bearer" = [])),
    responses(
        (status = 201, description = "Property registered"),
        (status = 400, description = "Validation failed"),
        (status = 401, description = "Missing or invalid token")
    )
)]
pub async fn register_property(
    Auth(_user): Auth,
    BearerToken(token): BearerToken,
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let mut v = Validator::new();
    v.matricula(&body, "matriculaId");
    v.require(&body, "comarca");
    v.require(&body, "endereco");
    v.wallet(&body, "proprietario");
    v.require(&body, "tipo");
    v.finish()?;

    let created = state.orchestrator.register_property(&token, &body).await?;
    state.cache.invalidate_prefix(PROPERTY_CACHE_PREFIX);
    Ok((StatusCode::CREATED, Json(created)))
}

/// List tokenized properties held by a wallet (chain-only view).
#[utoipa::path(
    get,
    path = "/properties/owner/{wallet_address}",
    tag = "Properties",
    params(("wallet_address" = String, Path, description = "Holder wallet address")),
    responses(
        (status = 200, description = "On-chain holdings"),
        (status = 400, description = "Invalid wallet address format"),
        (status = 503, description = "Offchain API unavailable")
    )
)]
pub async fn properties_by_owner(
    Path(wallet_address): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<Value>, ApiError> {
    if !validate::is_valid_wallet_address(&wallet_address) {
        return Err(ApiError::validation(vec![validate::wallet_format_message(
            "walletAddress",
        )]));
    }

    let cache_key = format!("{PROPERTY_CACHE_PREFIX}owner:{}", wallet_address.to_lowercase());
    if let Some(cached) = state.cache.get(&cache_key) {
        return Ok(Json(cached));
    }

    let holdings = state.offchain.properties_by_wallet(&wallet_address).await?;
    state.cache.put(cache_key, holdings.clone());
    Ok(Json(holdings))
}

/// Chain lookup that degrades to `None` instead of failing the request.
async fn fetch_chain_best_effort(
    offchain: &crate::clients::OffchainClient,
    matricula_id: &str,
) -> Option<ChainProperty> {
    match offchain.property_onchain(matricula_id).await {
        Ok(chain) => Some(chain),
        Err(e) => {
            tracing::warn!(
                matricula_id = matricula_id,
                error = %e,
                "chain enrichment unavailable; serving registry data only"
            );
            None
        }
    }
}
