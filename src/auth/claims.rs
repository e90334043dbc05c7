// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! JWT claims and the verified identity carried through a request.

use axum::http::Extensions;
use serde::{Deserialize, Serialize};

/// Claims carried in tokens issued by this service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserClaims {
    /// Subject: the user ID assigned by the user store
    pub user_id: i64,
    /// Issued at (seconds since epoch)
    pub iat: i64,
    /// Expiry (seconds since epoch)
    pub exp: i64,
}

/// Identity established by the authorization gate for a single request.
///
/// Inserted into the request extensions after a token verifies and dropped
/// with the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerifiedIdentity {
    pub user_id: i64,
}

impl VerifiedIdentity {
    /// Read the identity the gate attached, if it ran.
    pub fn from_extensions(extensions: &Extensions) -> Option<Self> {
        extensions.get::<VerifiedIdentity>().copied()
    }
}
