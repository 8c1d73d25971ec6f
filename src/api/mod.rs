// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Matricula Gateway

use axum::{
    http::{HeaderValue, Request},
    routing::{get, post, put},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    auth::claims::AuthenticatedUser,
    models::{
        ChainProperty, ChainTransfer, LoginResponse, PropertyView, RegistryProperty,
        RegistryTransfer, TransferStatusView, UserAccount,
    },
    state::AppState,
};

pub mod auth;
pub mod health;
pub mod properties;
pub mod transfers;

/// Request-ID generator for the `x-request-id` header.
#[derive(Clone, Copy, Default)]
struct UuidRequestId;

impl MakeRequestId for UuidRequestId {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let id = uuid::Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

pub fn router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.allowed_origins);

    let routes = Router::new()
        .route("/auth/login", post(auth::login))
        .route("/auth/register", post(auth::register))
        .route("/auth/wallet", put(auth::update_wallet))
        .route("/auth/me", get(auth::me))
        .route("/properties/my", get(properties::my_properties))
        .route(
            "/properties/{matricula_id}/full",
            get(properties::property_full),
        )
        .route("/properties/register", post(properties::register_property))
        .route(
            "/properties/owner/{wallet_address}",
            get(properties::properties_by_owner),
        )
        .route("/transfers/initiate", post(transfers::initiate_transfer))
        .route("/transfers/approve", post(transfers::approve_transfer))
        .route("/transfers/accept", post(transfers::accept_transfer))
        .route("/transfers/execute", post(transfers::execute_transfer))
        .route(
            "/transfers/{transfer_id}/status",
            get(transfers::transfer_status),
        )
        .route("/transfers/my", get(transfers::my_transfers))
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .route("/health/live", get(health::liveness))
        .with_state(state);

    routes
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(cors)
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(UuidRequestId))
}

/// Restrict CORS to the configured origins; an empty allowlist means
/// permissive (development default).
fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    if allowed_origins.is_empty() {
        return CorsLayer::permissive();
    }
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}

#[derive(OpenApi)]
#[openapi(
    paths(
        auth::login,
        auth::register,
        auth::update_wallet,
        auth::me,
        properties::my_properties,
        properties::property_full,
        properties::register_property,
        properties::properties_by_owner,
        transfers::initiate_transfer,
        transfers::approve_transfer,
        transfers::accept_transfer,
        transfers::execute_transfer,
        transfers::transfer_status,
        transfers::my_transfers,
        health::health,
        health::readiness,
        health::liveness
    ),
    components(
        schemas(
            LoginResponse,
            UserAccount,
            AuthenticatedUser,
            RegistryProperty,
            RegistryTransfer,
            ChainProperty,
            ChainTransfer,
            PropertyView,
            TransferStatusView,
            health::ReadyResponse,
            health::HealthChecks,
            health::HealthResponse
        )
    ),
    tags(
        (name = "Auth", description = "Credential exchange and account proxying"),
        (name = "Properties", description = "Registry + on-chain property views"),
        (name = "Transfers", description = "Transfer lifecycle and status aggregation"),
        (name = "Health", description = "Liveness, readiness, and upstream probes")
    )
)]
struct ApiDoc;
