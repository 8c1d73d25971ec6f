// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Matricula Gateway

//! # Upstream Clients
//!
//! Typed HTTP callers for the two upstream services:
//!
//! - [`OrchestratorClient`] — relational system of record (accounts,
//!   property metadata, transfer bookkeeping). Short timeout.
//! - [`OffchainClient`] — ledger-facing service (on-chain properties,
//!   transfers, identities). Long timeout; chain operations are slow.
//!
//! Every call classifies failure exactly one of three ways, which is what
//! lets handlers treat "upstream down" as a recoverable case distinct from
//! "upstream rejected the request":
//!
//! 1. Upstream replied non-2xx → [`UpstreamError::Response`], passing the
//!    upstream's own message/status (and field error list) through.
//! 2. No response at all (connect/timeout) → [`UpstreamError::Unavailable`].
//! 3. Request construction or body decode failed → [`UpstreamError::Internal`].

pub mod offchain;
pub mod orchestrator;

pub use offchain::OffchainClient;
pub use orchestrator::OrchestratorClient;

use std::time::Duration;

use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

/// Failure of a single upstream call.
#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    /// The upstream returned an error response; its message and status are
    /// relayed to the client untouched.
    #[error("{message}")]
    Response {
        status: u16,
        message: String,
        errors: Option<Vec<String>>,
    },

    /// No response was received (connection refused, DNS failure, timeout).
    #[error("{service} service is unavailable")]
    Unavailable { service: &'static str },

    /// Request construction failed or a 2xx body could not be decoded.
    #[error("upstream call failed: {0}")]
    Internal(String),
}

impl UpstreamError {
    /// Whether this is an upstream "entity absent" response.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            UpstreamError::Response { status, .. } if *status == StatusCode::NOT_FOUND.as_u16()
        )
    }
}

/// Error envelope shape used by both upstreams. Fields are optional so a
/// plain-text or partially structured error body still classifies cleanly.
#[derive(Debug, Deserialize)]
struct UpstreamErrorBody {
    message: Option<String>,
    errors: Option<Vec<String>>,
}

/// Shared request machinery embedded by both typed clients.
///
/// Holds the upstream's display name (for unavailability messages), its base
/// URL, and a dedicated `reqwest::Client` carrying that upstream's timeout.
#[derive(Debug, Clone)]
pub(crate) struct ServiceCaller {
    service: &'static str,
    base_url: String,
    http: Client,
}

impl ServiceCaller {
    pub(crate) fn new(
        service: &'static str,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, UpstreamError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| UpstreamError::Internal(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            service,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        })
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        token: Option<&str>,
    ) -> Result<T, UpstreamError> {
        self.request(Method::GET, path, token, None).await
    }

    pub(crate) async fn post_json<T: DeserializeOwned>(
        &self,
        path: &str,
        token: Option<&str>,
        body: &Value,
    ) -> Result<T, UpstreamError> {
        self.request(Method::POST, path, token, Some(body)).await
    }

    pub(crate) async fn put_json<T: DeserializeOwned>(
        &self,
        path: &str,
        token: Option<&str>,
        body: &Value,
    ) -> Result<T, UpstreamError> {
        self.request(Method::PUT, path, token, Some(body)).await
    }

    async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        body: Option<&Value>,
    ) -> Result<T, UpstreamError> {
        let url = format!("{}{}", self.base_url, path);

        let mut request = self.http.request(method.clone(), &url);
        if let Some(token) = token {
            request = request.header("Authorization", format!("Bearer {token}"));
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| self.classify_send(path, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(self.error_from_response(method, path, status, response).await);
        }

        response.json().await.map_err(|e| {
            UpstreamError::Internal(format!(
                "{} {} {path} returned an undecodable body: {e}",
                self.service, method
            ))
        })
    }

    /// Classify a transport-level `reqwest` failure. Builder errors are our
    /// fault (500); anything where no response arrived is unavailability.
    fn classify_send(&self, path: &str, err: reqwest::Error) -> UpstreamError {
        if err.is_builder() {
            return UpstreamError::Internal(format!("failed to build request for {path}: {err}"));
        }
        tracing::warn!(
            service = self.service,
            path = path,
            error = %err,
            "upstream unreachable"
        );
        UpstreamError::Unavailable {
            service: self.service,
        }
    }

    /// Translate a non-2xx upstream response into a pass-through error,
    /// preserving any structured field-level error list.
    async fn error_from_response(
        &self,
        method: Method,
        path: &str,
        status: StatusCode,
        response: reqwest::Response,
    ) -> UpstreamError {
        let raw = response.text().await.unwrap_or_default();
        let parsed: Option<UpstreamErrorBody> = serde_json::from_str(&raw).ok();

        let (message, errors) = match parsed {
            Some(body) => (
                body.message
                    .unwrap_or_else(|| default_error_message(status)),
                body.errors,
            ),
            None if !raw.trim().is_empty() => (raw.trim().to_string(), None),
            None => (default_error_message(status), None),
        };

        tracing::debug!(
            service = self.service,
            method = %method,
            path = path,
            status = status.as_u16(),
            "upstream returned error response"
        );

        UpstreamError::Response {
            status: status.as_u16(),
            message,
            errors,
        }
    }
}

fn default_error_message(status: StatusCode) -> String {
    match status.canonical_reason() {
        Some(reason) => reason.to_string(),
        None => format!("upstream returned status {}", status.as_u16()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_detection() {
        let nf = UpstreamError::Response {
            status: 404,
            message: "Transfer not found".to_string(),
            errors: None,
        };
        assert!(nf.is_not_found());

        let bad = UpstreamError::Response {
            status: 400,
            message: "nope".to_string(),
            errors: None,
        };
        assert!(!bad.is_not_found());

        let down = UpstreamError::Unavailable {
            service: "Orchestrator",
        };
        assert!(!down.is_not_found());
    }

    #[test]
    fn unavailable_message_names_the_service() {
        let err = UpstreamError::Unavailable {
            service: "Offchain API",
        };
        assert_eq!(err.to_string(), "Offchain API service is unavailable");
    }

    #[test]
    fn default_error_message_uses_canonical_reason() {
        assert_eq!(
            default_error_message(StatusCode::BAD_GATEWAY),
            "Bad Gateway"
        );
    }
}
