// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Matricula Gateway

//! Single error boundary for the gateway.
//!
//! Every failure — local validation, auth rejection, upstream error,
//! unexpected internal fault — leaves the system as one uniform envelope:
//! `{message, statusCode, errors?}` with a matching HTTP status. Unclassified
//! failures are logged in full and masked as a generic 500; internal detail
//! never crosses the boundary.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::clients::UpstreamError;

/// Application error carrying the final wire status and message.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    /// Per-field messages for validation failures.
    pub errors: Option<Vec<String>>,
}

/// Wire shape of every error response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorEnvelope {
    message: String,
    status_code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<Vec<String>>,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            errors: None,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    /// Validation failure with a per-field message list.
    pub fn validation(errors: Vec<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: "Validation failed".to_string(),
            errors: Some(errors),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new(StatusCode::SERVICE_UNAVAILABLE, message)
    }

    /// Unexpected failure: log the detail, emit a generic envelope.
    pub fn internal(detail: impl std::fmt::Display) -> Self {
        tracing::error!(error = %detail, "unexpected internal error");
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
    }
}

impl From<UpstreamError> for ApiError {
    fn from(err: UpstreamError) -> Self {
        match err {
            UpstreamError::Response {
                status,
                message,
                errors,
            } => Self {
                // An out-of-range code from a misbehaving upstream is
                // unclassifiable; treat it like any other unexpected fault.
                status: StatusCode::from_u16(status)
                    .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
                message,
                errors,
            },
            UpstreamError::Unavailable { .. } => Self::service_unavailable(err.to_string()),
            UpstreamError::Internal(detail) => Self::internal(detail),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorEnvelope {
            message: self.message,
            status_code: self.status.as_u16(),
            errors: self.errors,
        });
        (self.status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[test]
    fn constructors_set_status_and_message() {
        let nf = ApiError::not_found("missing");
        assert_eq!(nf.status, StatusCode::NOT_FOUND);
        assert_eq!(nf.message, "missing");

        let forbidden = ApiError::forbidden("not yours");
        assert_eq!(forbidden.status, StatusCode::FORBIDDEN);

        let unavailable = ApiError::service_unavailable("down");
        assert_eq!(unavailable.status, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn internal_masks_detail() {
        let err = ApiError::internal("secret stack trace");
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message, "Internal server error");
    }

    #[test]
    fn upstream_response_passes_through_status_and_errors() {
        let upstream = UpstreamError::Response {
            status: 422,
            message: "cpf already registered".to_string(),
            errors: Some(vec!["cpf: already in use".to_string()]),
        };
        let err = ApiError::from(upstream);
        assert_eq!(err.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.message, "cpf already registered");
        assert_eq!(err.errors.as_ref().map(Vec::len), Some(1));
    }

    #[test]
    fn upstream_unavailable_maps_to_503() {
        let upstream = UpstreamError::Unavailable {
            service: "Orchestrator",
        };
        let err = ApiError::from(upstream);
        assert_eq!(err.status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(err.message, "Orchestrator service is unavailable");
    }

    #[tokio::test]
    async fn into_response_emits_the_envelope() {
        let response = ApiError::validation(vec!["email: invalid format".to_string()])
            .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body_bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();
        assert_eq!(body["message"], "Validation failed");
        assert_eq!(body["statusCode"], 400);
        assert_eq!(body["errors"][0], "email: invalid format");
    }

    #[tokio::test]
    async fn envelope_omits_errors_when_absent() {
        let response = ApiError::not_found("Property not found").into_response();
        let body_bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();
        assert!(body.get("errors").is_none());
        assert_eq!(body["statusCode"], 404);
    }
}
