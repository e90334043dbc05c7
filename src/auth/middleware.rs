// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authorization gate for Axum.
//!
//! Wraps every route that needs a caller identity. A request passes through
//! only when it carries `Authorization: Bearer <token>` with a token that
//! verifies; the subject is then attached to the request extensions as a
//! [`VerifiedIdentity`] for the [`Auth`](super::Auth) extractor to read.
//!
//! ```rust,ignore
//! let protected = Router::new()
//!     .route("/todos", get(list_todos))
//!     .route_layer(axum::middleware::from_fn_with_state(tokens, require_auth));
//! ```

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::{AuthError, TokenService, VerifiedIdentity};

/// Case-sensitive scheme prefix expected on the header value.
const BEARER_PREFIX: &str = "Bearer ";

/// Authorization gate middleware.
///
/// Rejections are terminal: the downstream handler is never invoked.
pub async fn require_auth(
    State(tokens): State<Arc<TokenService>>,
    mut request: Request,
    next: Next,
) -> Response {
    match authorize(request.headers(), &tokens) {
        Ok(identity) => {
            request.extensions_mut().insert(identity);
            next.run(request).await
        }
        Err(e) => {
            tracing::debug!(
                error_code = e.error_code(),
                method = %request.method(),
                path = %request.uri().path(),
                "Request rejected by authorization gate"
            );
            e.into_response()
        }
    }
}

/// Run the header checks and token verification for one request.
pub fn authorize(headers: &HeaderMap, tokens: &TokenService) -> Result<VerifiedIdentity, AuthError> {
    let token = bearer_token(headers)?;
    let user_id = tokens.verify(token)?;
    Ok(VerifiedIdentity { user_id })
}

/// Pull the token out of `Authorization: Bearer <token>`.
fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingAuthHeader)?;

    let value = value.to_str().map_err(|_| AuthError::InvalidAuthHeader)?;
    if value.is_empty() {
        return Err(AuthError::MissingAuthHeader);
    }

    value
        .strip_prefix(BEARER_PREFIX)
        .ok_or(AuthError::InvalidAuthHeader)
}
