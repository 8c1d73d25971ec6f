// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Matricula Gateway

//! Authentication errors.
//!
//! Each rejection carries a distinct message — callers can tell a missing
//! header from a malformed scheme from a bad signature from an expired
//! token — but all of them render as the standard 401 error envelope.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::error::ApiError;

/// Bearer credential rejection.
#[derive(Debug, PartialEq, Eq)]
pub enum AuthError {
    /// No `Authorization` header present.
    MissingAuthHeader,
    /// Header does not match the two-part `Bearer <token>` form.
    InvalidAuthHeader,
    /// Token payload could not be decoded.
    MalformedToken,
    /// Signature does not verify against the shared secret.
    InvalidSignature,
    /// Token expiry has passed.
    TokenExpired,
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::MissingAuthHeader => write!(f, "Authorization header is required"),
            AuthError::InvalidAuthHeader => {
                write!(
                    f,
                    "Invalid authorization header format (expected 'Bearer <token>')"
                )
            }
            AuthError::MalformedToken => write!(f, "Token is malformed"),
            AuthError::InvalidSignature => write!(f, "Token signature is invalid"),
            AuthError::TokenExpired => write!(f, "Token has expired"),
        }
    }
}

impl std::error::Error for AuthError {}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        ApiError::new(StatusCode::UNAUTHORIZED, err.to_string())
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        ApiError::from(self).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[tokio::test]
    async fn auth_errors_render_the_standard_envelope() {
        let response = AuthError::MissingAuthHeader.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let body_bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();
        assert_eq!(body["message"], "Authorization header is required");
        assert_eq!(body["statusCode"], 401);
    }

    #[test]
    fn messages_are_distinct_per_failure_mode() {
        let messages = [
            AuthError::MissingAuthHeader.to_string(),
            AuthError::InvalidAuthHeader.to_string(),
            AuthError::MalformedToken.to_string(),
            AuthError::InvalidSignature.to_string(),
            AuthError::TokenExpired.to_string(),
        ];
        for (i, a) in messages.iter().enumerate() {
            for (j, b) in messages.iter().enumerate() {
                if i != j {
                    assert_ne!(a, b);
                }
            }
        }
    }
}
