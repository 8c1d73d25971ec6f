// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Matricula Gateway

//! Matrícula Gateway - Property Registry API Gateway
//!
//! Stateless gateway between the browser client and two upstream services:
//! the Orchestrator (relational system of record) and the Offchain API
//! (ledger state). Proxies authentication, validates bearer tokens, and
//! merges per-property / per-transfer records from both sources.
//!
//! ## Modules
//!
//! - `api` - HTTP handlers and router (Axum)
//! - `auth` - Bearer-token verification (HS256 shared secret)
//! - `clients` - Typed Orchestrator / Offchain API callers
//! - `cache` - TTL'd LRU response cache
//! - `models` - Upstream schemas and merged view models

pub mod api;
pub mod auth;
pub mod cache;
pub mod clients;
pub mod config;
pub mod error;
pub mod models;
pub mod state;
pub mod validate;
