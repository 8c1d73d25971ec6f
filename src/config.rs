// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Matricula Gateway

//! # Runtime Configuration
//!
//! Configuration is loaded from the environment once at startup. The gateway
//! holds no persistent state; everything it needs to run is in this struct.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `ORCHESTRATOR_BASE_URL` | Base URL of the Orchestrator service | Required |
//! | `ORCHESTRATOR_TIMEOUT_SECS` | Per-call timeout for Orchestrator requests | `10` |
//! | `OFFCHAIN_API_BASE_URL` | Base URL of the Offchain API | Required |
//! | `OFFCHAIN_API_TIMEOUT_SECS` | Per-call timeout for Offchain API requests | `45` |
//! | `JWT_SECRET` | Shared secret for bearer token verification | Required |
//! | `ALLOWED_ORIGINS` | Comma-separated CORS origin allowlist | permissive |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::time::Duration;

/// Default per-call timeout for the Orchestrator (relational store).
const DEFAULT_ORCHESTRATOR_TIMEOUT_SECS: u64 = 10;

/// Default per-call timeout for the Offchain API. Ledger operations are
/// materially slower than relational lookups, so this is deliberately long.
const DEFAULT_OFFCHAIN_TIMEOUT_SECS: u64 = 45;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;

/// Resolved gateway configuration.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Orchestrator base URL (no trailing slash).
    pub orchestrator_base_url: String,
    /// Per-call timeout for Orchestrator requests.
    pub orchestrator_timeout: Duration,
    /// Offchain API base URL (no trailing slash).
    pub offchain_base_url: String,
    /// Per-call timeout for Offchain API requests.
    pub offchain_timeout: Duration,
    /// Shared secret for HS256 bearer token verification.
    pub jwt_secret: String,
    /// CORS origin allowlist. Empty means permissive.
    pub allowed_origins: Vec<String>,
    /// Bind address.
    pub host: String,
    /// Bind port.
    pub port: u16,
}

/// Configuration loading failure.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("{name} is not a valid URL: {detail}")]
    InvalidUrl { name: &'static str, detail: String },
}

impl GatewayConfig {
    /// Load configuration from the environment.
    ///
    /// Missing base URLs or `JWT_SECRET` are startup errors; the gateway
    /// refuses to come up partially configured.
    pub fn from_env() -> Result<Self, ConfigError> {
        let orchestrator_base_url = base_url_required("ORCHESTRATOR_BASE_URL")?;
        let offchain_base_url = base_url_required("OFFCHAIN_API_BASE_URL")?;
        let jwt_secret = env_required("JWT_SECRET")?;

        let orchestrator_timeout = Duration::from_secs(env_u64_or(
            "ORCHESTRATOR_TIMEOUT_SECS",
            DEFAULT_ORCHESTRATOR_TIMEOUT_SECS,
        ));
        let offchain_timeout = Duration::from_secs(env_u64_or(
            "OFFCHAIN_API_TIMEOUT_SECS",
            DEFAULT_OFFCHAIN_TIMEOUT_SECS,
        ));

        let allowed_origins = env_optional("ALLOWED_ORIGINS")
            .map(|raw| {
                raw.split(',')
                    .map(|o| o.trim().to_string())
                    .filter(|o| !o.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        let host = env_or_default("HOST", DEFAULT_HOST);
        let port = env_optional("PORT")
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        Ok(Self {
            orchestrator_base_url,
            orchestrator_timeout,
            offchain_base_url,
            offchain_timeout,
            jwt_secret,
            allowed_origins,
            host,
            port,
        })
    }
}

fn base_url_required(name: &'static str) -> Result<String, ConfigError> {
    let raw = env_required(name)?;
    url::Url::parse(&raw).map_err(|e| ConfigError::InvalidUrl {
        name,
        detail: e.to_string(),
    })?;
    Ok(raw.trim_end_matches('/').to_string())
}

fn env_required(name: &'static str) -> Result<String, ConfigError> {
    env_optional(name).ok_or(ConfigError::Missing(name))
}

fn env_optional(name: &str) -> Option<String> {
    match std::env::var(name) {
        Ok(value) => {
            let trimmed = value.trim().to_string();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed)
            }
        }
        Err(_) => None,
    }
}

fn env_or_default(name: &str, default: &str) -> String {
    env_optional(name).unwrap_or_else(|| default.to_string())
}

fn env_u64_or(name: &str, default: u64) -> u64 {
    env_optional(name)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_u64_or_falls_back_on_garbage() {
        std::env::set_var("GATEWAY_TEST_TIMEOUT", "not-a-number");
        assert_eq!(env_u64_or("GATEWAY_TEST_TIMEOUT", 45), 45);
        std::env::remove_var("GATEWAY_TEST_TIMEOUT");
    }

    #[test]
    fn env_optional_treats_blank_as_absent() {
        std::env::set_var("GATEWAY_TEST_BLANK", "   ");
        assert_eq!(env_optional("GATEWAY_TEST_BLANK"), None);
        std::env::remove_var("GATEWAY_TEST_BLANK");
    }

    #[test]
    fn base_url_required_rejects_non_urls() {
        std::env::set_var("GATEWAY_TEST_URL", "not a url");
        let err = base_url_required("GATEWAY_TEST_URL").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidUrl { .. }));
        std::env::remove_var("GATEWAY_TEST_URL");
    }

    #[test]
    fn base_url_required_strips_trailing_slash() {
        std::env::set_var("GATEWAY_TEST_URL2", "http://orchestrator:3001/");
        let url = base_url_required("GATEWAY_TEST_URL2").unwrap();
        assert_eq!(url, "http://orchestrator:3001");
        std::env::remove_var("GATEWAY_TEST_URL2");
    }
}
