// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// Why a presented token was refused.
///
/// Kept for logs only. Every variant reaches the client as a 401.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenRejection {
    /// Wrong segment count, bad base64, or undecodable claims
    Malformed,
    /// Header declares something other than HS256
    UnsupportedAlgorithm,
    /// Signature does not match header + payload under our secret
    BadSignature,
    /// Current time is at or past `exp`
    Expired,
}

impl TokenRejection {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenRejection::Malformed => "token is malformed",
            TokenRejection::UnsupportedAlgorithm => "unexpected signing algorithm",
            TokenRejection::BadSignature => "token signature is invalid",
            TokenRejection::Expired => "token has expired",
        }
    }
}

impl std::fmt::Display for TokenRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Authentication error type.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No authorization header present
    #[error("Authorization header required")]
    MissingAuthHeader,
    /// Header present but not `Bearer <token>`
    #[error("Invalid token format (expected 'Bearer <token>')")]
    InvalidAuthHeader,
    /// Token failed verification
    #[error("Invalid or expired token: {0}")]
    InvalidToken(TokenRejection),
    /// A handler asked for the caller's identity but the gate never ran
    #[error("User ID not found in request context. Authentication is required")]
    ContextMissing,
    /// Signing secret is unset or empty
    #[error("JWT signing secret is not configured")]
    Configuration,
    /// Internal error
    #[error("Internal authentication error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::MissingAuthHeader => "missing_auth_header",
            AuthError::InvalidAuthHeader => "invalid_auth_header",
            AuthError::InvalidToken(TokenRejection::Malformed) => "malformed_token",
            AuthError::InvalidToken(TokenRejection::UnsupportedAlgorithm) => "invalid_algorithm",
            AuthError::InvalidToken(TokenRejection::BadSignature) => "invalid_signature",
            AuthError::InvalidToken(TokenRejection::Expired) => "token_expired",
            AuthError::ContextMissing => "context_missing",
            AuthError::Configuration => "configuration_error",
            AuthError::Internal(_) => "internal_error",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::MissingAuthHeader
            | AuthError::InvalidAuthHeader
            | AuthError::InvalidToken(_)
            | AuthError::ContextMissing => StatusCode::UNAUTHORIZED,
            AuthError::Configuration | AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        // Server-side failures get a fixed body; details stay in the logs.
        let body = if status.is_server_error() {
            tracing::error!(error_code = self.error_code(), error = %self, "Authentication unavailable");
            "Internal authentication error".to_string()
        } else {
            self.to_string()
        };
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn missing_auth_returns_401_with_plain_text() {
        let response = AuthError::MissingAuthHeader.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_text(response).await, "Authorization header required");
    }

    #[tokio::test]
    async fn invalid_token_includes_reason() {
        let response = AuthError::InvalidToken(TokenRejection::Expired).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            body_text(response).await,
            "Invalid or expired token: token has expired"
        );
    }

    #[tokio::test]
    async fn configuration_error_is_500_without_details() {
        let response = AuthError::Configuration.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_text(response).await, "Internal authentication error");
    }

    #[test]
    fn every_token_rejection_is_unauthorized() {
        for reason in [
            TokenRejection::Malformed,
            TokenRejection::UnsupportedAlgorithm,
            TokenRejection::BadSignature,
            TokenRejection::Expired,
        ] {
            assert_eq!(
                AuthError::InvalidToken(reason).status_code(),
                StatusCode::UNAUTHORIZED
            );
        }
        assert_eq!(AuthError::ContextMissing.status_code(), StatusCode::UNAUTHORIZED);
    }
}
