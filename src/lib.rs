// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Relational To-Do - Multi-user to-do list service
//!
//! Users register and log in to obtain a short-lived HS256 bearer token;
//! every `/todos` route sits behind an authorization gate that verifies the
//! token and scopes storage access to its subject.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - Token issuance, verification and the authorization gate
//! - `config` - Environment configuration
//! - `storage` - Embedded redb persistence for users and to-do items

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod state;
pub mod storage;
