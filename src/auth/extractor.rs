// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Matricula Gateway

//! Axum extractors for bearer authentication.
//!
//! Use the `Auth` extractor in handlers that require a verified identity:
//!
//! ```rust,ignore
//! async fn my_handler(Auth(user): Auth) -> impl IntoResponse {
//!     // user is AuthenticatedUser
//! }
//! ```
//!
//! `OptionalAuth` runs the same verification but proceeds unauthenticated on
//! any failure; `BearerToken` checks header presence and shape only, for
//! routes that forward the credential verbatim without decoding it.

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};

use super::{AuthError, AuthenticatedUser, Claims};
use crate::state::AppState;

/// Clock skew tolerance (60 seconds).
const CLOCK_SKEW_LEEWAY: u64 = 60;

/// Pull the raw token out of the `Authorization` header.
///
/// Distinguishes "no header" from "not the two-part `Bearer <token>` form".
fn bearer_token(parts: &Parts) -> Result<&str, AuthError> {
    let header = parts
        .headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingAuthHeader)?
        .to_str()
        .map_err(|_| AuthError::InvalidAuthHeader)?;

    let token = header
        .strip_prefix("Bearer ")
        .ok_or(AuthError::InvalidAuthHeader)?
        .trim();

    if token.is_empty() || token.contains(char::is_whitespace) {
        return Err(AuthError::InvalidAuthHeader);
    }

    Ok(token)
}

/// Verify a token against the shared secret and extract the claims.
///
/// Stateless: no account lookup — the signature and embedded expiry are the
/// whole story.
pub fn verify_token(token: &str, secret: &str) -> Result<AuthenticatedUser, AuthError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = CLOCK_SKEW_LEEWAY;
    validation.validate_aud = false;

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
        jsonwebtoken::errors::ErrorKind::InvalidSignature => AuthError::InvalidSignature,
        _ => AuthError::MalformedToken,
    })?;

    Ok(AuthenticatedUser::from(token_data.claims))
}

/// Extractor requiring a verified identity. Rejects with a 401 envelope.
pub struct Auth(pub AuthenticatedUser);

impl FromRequestParts<AppState> for Auth {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;
        let user = verify_token(token, &state.config.jwt_secret)?;
        Ok(Auth(user))
    }
}

/// Optional authentication.
///
/// Returns `None` instead of rejecting, for routes serving both anonymous
/// and authenticated callers.
pub struct OptionalAuth(pub Option<AuthenticatedUser>);

impl FromRequestParts<AppState> for OptionalAuth {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match Auth::from_request_parts(parts, state).await {
            Ok(Auth(user)) => Ok(OptionalAuth(Some(user))),
            Err(_) => Ok(OptionalAuth(None)),
        }
    }
}

/// Raw bearer credential, presence- and shape-checked only.
///
/// For routes that forward the token to an upstream verbatim; the gateway
/// does not decode claims on these paths.
pub struct BearerToken(pub String);

impl FromRequestParts<AppState> for BearerToken {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(BearerToken(bearer_token(parts)?.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GatewayConfig;
    use axum::http::Request;
    use jsonwebtoken::{encode, EncodingKey, Header};

    const TEST_SECRET: &str = "test-secret-key-1234567890";

    fn test_state() -> AppState {
        AppState::new(GatewayConfig {
            orchestrator_base_url: "http://orchestrator.test".to_string(),
            orchestrator_timeout: std::time::Duration::from_secs(1),
            offchain_base_url: "http://offchain.test".to_string(),
            offchain_timeout: std::time::Duration::from_secs(1),
            jwt_secret: TEST_SECRET.to_string(),
            allowed_origins: vec![],
            host: "127.0.0.1".to_string(),
            port: 0,
        })
        .expect("test state")
    }

    fn mint_token(secret: &str, exp_offset_secs: i64) -> String {
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: "42".to_string(),
            email: "a@b.com".to_string(),
            role: "USER".to_string(),
            iat: now,
            exp: now + exp_offset_secs,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .expect("token")
    }

    fn parts_with_header(value: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/test");
        if let Some(value) = value {
            builder = builder.header("Authorization", value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[tokio::test]
    async fn missing_header_is_rejected() {
        let state = test_state();
        let mut parts = parts_with_header(None);
        let result = Auth::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(AuthError::MissingAuthHeader)));
    }

    #[tokio::test]
    async fn non_bearer_scheme_is_rejected() {
        let state = test_state();
        let mut parts = parts_with_header(Some("Basic dXNlcjpwYXNz"));
        let result = Auth::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(AuthError::InvalidAuthHeader)));
    }

    #[tokio::test]
    async fn empty_token_is_rejected() {
        let state = test_state();
        let mut parts = parts_with_header(Some("Bearer "));
        let result = Auth::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(AuthError::InvalidAuthHeader)));
    }

    #[tokio::test]
    async fn wrong_secret_is_an_invalid_signature() {
        let state = test_state();
        let token = mint_token("some-other-secret-entirely", 3600);
        let mut parts = parts_with_header(Some(&format!("Bearer {token}")));
        let result = Auth::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(AuthError::InvalidSignature)));
    }

    #[tokio::test]
    async fn expired_token_is_distinguished() {
        let state = test_state();
        // Far enough in the past to clear the leeway window.
        let token = mint_token(TEST_SECRET, -7200);
        let mut parts = parts_with_header(Some(&format!("Bearer {token}")));
        let result = Auth::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(AuthError::TokenExpired)));
    }

    #[tokio::test]
    async fn garbage_token_is_malformed() {
        let state = test_state();
        let mut parts = parts_with_header(Some("Bearer not.a.jwt"));
        let result = Auth::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(AuthError::MalformedToken)));
    }

    #[tokio::test]
    async fn valid_token_yields_the_claims_identity() {
        let state = test_state();
        let token = mint_token(TEST_SECRET, 3600);
        let mut parts = parts_with_header(Some(&format!("Bearer {token}")));
        let Auth(user) = Auth::from_request_parts(&mut parts, &state)
            .await
            .expect("auth");
        assert_eq!(user.user_id, "42");
        assert_eq!(user.email, "a@b.com");
        assert_eq!(user.role, "USER");
    }

    #[tokio::test]
    async fn optional_auth_swallows_failures() {
        let state = test_state();
        let mut parts = parts_with_header(Some("Bearer not.a.jwt"));
        let OptionalAuth(user) = OptionalAuth::from_request_parts(&mut parts, &state)
            .await
            .expect("infallible");
        assert!(user.is_none());
    }

    #[tokio::test]
    async fn optional_auth_carries_a_valid_identity() {
        let state = test_state();
        let token = mint_token(TEST_SECRET, 3600);
        let mut parts = parts_with_header(Some(&format!("Bearer {token}")));
        let OptionalAuth(user) = OptionalAuth::from_request_parts(&mut parts, &state)
            .await
            .expect("infallible");
        assert_eq!(user.expect("user").user_id, "42");
    }

    #[tokio::test]
    async fn bearer_token_does_not_verify_the_signature() {
        let state = test_state();
        // Signed with the wrong secret — BearerToken only checks shape.
        let token = mint_token("some-other-secret-entirely", 3600);
        let mut parts = parts_with_header(Some(&format!("Bearer {token}")));
        let BearerToken(raw) = BearerToken::from_request_parts(&mut parts, &state)
            .await
            .expect("shape check only");
        assert_eq!(raw, token);
    }
}
