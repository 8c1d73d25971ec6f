// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Matricula Gateway

//! JWT claims and the authenticated-user representation.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Claims embedded in a gateway bearer token.
///
/// Tokens are minted by the Orchestrator during credential exchange and
/// verified here statelessly: validity is entirely a function of the
/// signature and the embedded expiry — no account lookup happens on the
/// request path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject — the canonical user identifier.
    pub sub: String,
    /// Account email.
    pub email: String,
    /// Account role (e.g. `USER`, `ADMIN`).
    pub role: String,
    /// Issued-at timestamp.
    pub iat: i64,
    /// Expiration timestamp.
    pub exp: i64,
}

/// Identity attached to the request context after verification.
///
/// Lifetime is one request; never mutated after extraction.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthenticatedUser {
    /// Canonical user ID (`sub` claim).
    pub user_id: String,
    pub email: String,
    pub role: String,
}

impl From<Claims> for AuthenticatedUser {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.sub,
            email: claims.email,
            role: claims.role,
        }
    }
}
