// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Stateless bearer-token authentication for the to-do API.
//!
//! ## Auth Flow
//!
//! 1. Client registers or logs in; credentials are checked against the user
//!    store and an Argon2 hash
//! 2. [`TokenService::issue`] returns an HS256 JWT valid for 2 hours
//! 3. Client sends `Authorization: Bearer <token>` on every `/todos` request
//! 4. [`require_auth`] verifies the token and attaches a [`VerifiedIdentity`]
//!    to the request
//! 5. Handlers read it through the [`Auth`] extractor and scope all queries
//!    by `user_id`
//!
//! ## Security
//!
//! - Only `HS256` is accepted; other algorithms (including `none`) are refused
//! - Signature comparison is constant-time
//! - Expiry is strict (`now >= exp` is expired) with no leeway
//! - Nothing is stored server-side; tokens cannot be revoked

pub mod claims;
pub mod clock;
pub mod error;
pub mod extractor;
pub mod middleware;
pub mod password;
pub mod token;

pub use claims::{UserClaims, VerifiedIdentity};
pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{AuthError, TokenRejection};
pub use extractor::Auth;
pub use middleware::require_auth;
pub use token::{AuthConfig, TokenService, TOKEN_VALIDITY_SECS};
