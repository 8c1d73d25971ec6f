// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Matricula Gateway

use axum::{extract::State, http::StatusCode, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::state::AppState;

/// Health check response with individual upstream status.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReadyResponse {
    /// Overall health status ("ok" or "degraded").
    pub status: String,
    pub timestamp: DateTime<Utc>,
    /// Individual health checks and their results.
    pub checks: HealthChecks,
}

/// Individual health check results.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HealthChecks {
    /// Whether the gateway process is running.
    pub gateway: String,
    /// Orchestrator reachability.
    pub orchestrator: String,
    /// Offchain API reachability.
    pub offchain_api: String,
}

/// Simple health check response for liveness probes.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

/// Health check endpoint handler.
///
/// Probes both upstreams concurrently. Returns 200 when both respond,
/// 503 "degraded" otherwise.
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Gateway and upstreams are healthy", body = ReadyResponse),
        (status = 503, description = "An upstream is unreachable", body = ReadyResponse)
    )
)]
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<ReadyResponse>) {
    let (orchestrator, offchain) =
        tokio::join!(state.orchestrator.health(), state.offchain.health());

    let orchestrator_ok = orchestrator.is_ok();
    let offchain_ok = offchain.is_ok();
    let all_ok = orchestrator_ok && offchain_ok;

    let response = ReadyResponse {
        status: if all_ok { "ok" } else { "degraded" }.to_string(),
        timestamp: Utc::now(),
        checks: HealthChecks {
            gateway: "ok".to_string(),
            orchestrator: check_label(orchestrator_ok),
            offchain_api: check_label(offchain_ok),
        },
    };

    let status = if all_ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(response))
}

/// Liveness probe handler.
///
/// Always returns 200 if the process is running. Does not check upstreams —
/// use readiness for that.
#[utoipa::path(
    get,
    path = "/health/live",
    tag = "Health",
    responses(
        (status = 200, description = "Gateway is alive", body = HealthResponse)
    )
)]
pub async fn liveness() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        timestamp: Utc::now(),
    })
}

/// Readiness probe handler.
///
/// Returns 200 only when both upstreams are reachable.
#[utoipa::path(
    get,
    path = "/health/ready",
    tag = "Health",
    responses(
        (status = 200, description = "Gateway is ready", body = ReadyResponse),
        (status = 503, description = "Gateway is not ready", body = ReadyResponse)
    )
)]
pub async fn readiness(state: State<AppState>) -> (StatusCode, Json<ReadyResponse>) {
    health(state).await
}

fn check_label(ok: bool) -> String {
    if ok { "ok" } else { "unavailable" }.to_string()
}
