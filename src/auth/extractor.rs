// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractor for the caller identity.
//!
//! Use the `Auth` extractor in handlers mounted behind
//! [`require_auth`](super::require_auth):
//!
//! ```rust,ignore
//! async fn my_handler(Auth(identity): Auth) -> impl IntoResponse {
//!     // identity.user_id scopes every store query
//! }
//! ```

use axum::{extract::FromRequestParts, http::request::Parts};

use super::{AuthError, VerifiedIdentity};

/// Identity attached by the authorization gate.
///
/// Only reads request extensions; it never verifies a token itself. A handler
/// reached without the gate having run is rejected with 401.
pub struct Auth(pub VerifiedIdentity);

impl<S> FromRequestParts<S> for Auth
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match VerifiedIdentity::from_extensions(&parts.extensions) {
            Some(identity) => Ok(Auth(identity)),
            None => {
                tracing::error!(
                    path = %parts.uri.path(),
                    "Identity requested by a handler that is not behind the authorization gate"
                );
                Err(AuthError::ContextMissing)
            }
        }
    }
}
