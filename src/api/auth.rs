// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Matricula Gateway

//! Authentication endpoints.
//!
//! All four routes are proxies over the Orchestrator: the gateway validates
//! request shape locally, forwards, and relays. Login additionally reshapes
//! the Orchestrator's flat payload into `{token, user}`.

use axum::{extract::State, http::StatusCode, Json};
use serde_json::Value;

use crate::{
    auth::{Auth, BearerToken},
    error::ApiError,
    models::{LoginResponse, UserAccount},
    state::AppState,
    validate::Validator,
};

/// Exchange credentials for a bearer token.
///
/// The Orchestrator returns a flat record; the client contract nests the
/// account under `user`.
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "Auth",
    responses(
        (status = 200, description = "Credentials accepted", body = LoginResponse),
        (status = 400, description = "Malformed credentials"),
        (status = 401, description = "Credentials rejected by the Orchestrator"),
        (status = 503, description = "Orchestrator unavailable")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<LoginResponse>, ApiError> {
    let mut v = Validator::new();
    v.email(&body, "email");
    v.require(&body, "password");
    v.finish()?;

    let upstream = state.orchestrator.login(&body).await?;
    Ok(Json(LoginResponse::from(upstream)))
}

/// Create a new account.
#[utoipa::path(
    post,
    path = "/auth/register",
    tag = "Auth",
    responses(
        (status = 201, description = "Account created"),
        (status = 400, description = "Validation failed"),
        (status = 503, description = "Orchestrator unavailable")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let mut v = Validator::new();
    v.require(&body, "name");
    v.email(&body, "email");
    v.require(&body, "password");
    v.cpf(&body, "cpf");
    v.wallet_optional(&body, "walletAddress");
    v.finish()?;

    let created = state.orchestrator.register_user(&body).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Link or replace the caller's wallet address.
#[utoipa::path(
    put,
    path = "/auth/wallet",
    tag = "Auth",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Wallet updated"),
        (status = 400, description = "Invalid wallet address format"),
        (status = 401, description = "Missing or invalid token")
    )
)]
pub async fn update_wallet(
    Auth(_user): Auth,
    BearerToken(token): BearerToken,
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    let mut v = Validator::new();
    v.wallet(&body, "walletAddress");
    v.finish()?;

    let updated = state.orchestrator.update_wallet(&token, &body).await?;
    Ok(Json(updated))
}

/// Fetch the caller's account profile.
///
/// Header presence and shape are checked, but the credential is not decoded
/// here — it is forwarded verbatim and the Orchestrator is the judge.
#[utoipa::path(
    get,
    path = "/auth/me",
    tag = "Auth",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Account profile", body = UserAccount),
        (status = 401, description = "Missing or malformed Authorization header")
    )
)]
pub async fn me(
    BearerToken(token): BearerToken,
    State(state): State<AppState>,
) -> Result<Json<UserAccount>, ApiError> {
    let account = state.orchestrator.me(&token).await?;
    Ok(Json(account))
}
