// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Matricula Gateway

//! # Authentication Module
//!
//! Stateless bearer-token verification at the gateway boundary.
//!
//! ## Auth Flow
//!
//! 1. The Orchestrator mints an HS256 token during credential exchange
//! 2. The client sends `Authorization: Bearer <token>`
//! 3. The gateway:
//!    - verifies signature and expiry against the shared `JWT_SECRET`
//!    - extracts `{sub, email, role}` into [`AuthenticatedUser`]
//!    - attaches the identity to the request context
//!
//! No account lookup happens on the request path — validity is entirely a
//! function of the signature and embedded expiry. Rejections carry distinct
//! messages for missing header, bad format, invalid signature, and expiry,
//! all rendered as the standard 401 envelope. Clock skew tolerance is 60
//! seconds.

pub mod claims;
pub mod error;
pub mod extractor;

pub use claims::{AuthenticatedUser, Claims};
pub use error::AuthError;
pub use extractor::{Auth, BearerToken, OptionalAuth};
