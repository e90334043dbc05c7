// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Account endpoints: registration and login. Both are public and answer
//! with a freshly issued bearer token.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};

use crate::{
    auth::{
        password::{hash_password, verify_password, MIN_PASSWORD_LEN},
        AuthError,
    },
    error::ApiError,
    models::{LoginRequest, RegisterRequest, TokenResponse},
    state::AppState,
    storage::{DbError, UserRepository},
};

const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Unwrap a JSON body, answering 400 for anything that does not parse.
pub(super) fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload.map(|Json(body)| body).map_err(|rejection| {
        tracing::debug!(error = %rejection, "Rejected request body");
        ApiError::bad_request("Invalid request payload")
    })
}

fn issue_token(state: &AppState, user_id: i64) -> Result<TokenResponse, ApiError> {
    state
        .tokens
        .issue(user_id)
        .map(|token| TokenResponse { token })
        .map_err(|e: AuthError| {
            tracing::error!(user_id, error = %e, "Failed to issue token");
            ApiError::internal("Failed to generate authentication token")
        })
}

#[utoipa::path(
    post,
    path = "/register",
    request_body = RegisterRequest,
    tag = "Users",
    responses(
        (status = 201, description = "User created", body = TokenResponse),
        (status = 400, description = "Missing fields, short password or malformed body"),
        (status = 409, description = "Email already exists")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<TokenResponse>), ApiError> {
    let request = json_body(payload)?;

    if request.name.is_empty() || request.email.is_empty() || request.password.is_empty() {
        return Err(ApiError::bad_request("All fields are required"));
    }
    if request.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ApiError::bad_request(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters long"
        )));
    }

    let plaintext = request.password.clone();
    let password_hash = tokio::task::spawn_blocking(move || hash_password(&plaintext))
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Password hashing task failed");
            ApiError::internal("Failed to hash password")
        })?
        .map_err(|e| {
            tracing::error!(error = %e, "Password hashing failed");
            ApiError::internal("Failed to hash password")
        })?;

    let user = match UserRepository::new(&state.db).create(
        &request.name,
        &request.email,
        &password_hash,
    ) {
        Ok(user) => user,
        Err(DbError::Duplicate(_)) => return Err(ApiError::conflict("Email already exists")),
        Err(e) => return Err(e.into()),
    };

    tracing::info!(user_id = user.id, "User registered");
    Ok((StatusCode::CREATED, Json(issue_token(&state, user.id)?)))
}

#[utoipa::path(
    post,
    path = "/login",
    request_body = LoginRequest,
    tag = "Users",
    responses(
        (status = 200, description = "Login succeeded", body = TokenResponse),
        (status = 400, description = "Missing fields or malformed body"),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<TokenResponse>, ApiError> {
    let request = json_body(payload)?;

    if request.email.is_empty() || request.password.is_empty() {
        return Err(ApiError::bad_request("Input all fields to login"));
    }

    let Some(user) = UserRepository::new(&state.db).find_by_email(&request.email)? else {
        return Err(ApiError::unauthorized(INVALID_CREDENTIALS));
    };
    let stored_hash = user.password_hash.clone();
    let plaintext = request.password;
    let matches = tokio::task::spawn_blocking(move || verify_password(&stored_hash, &plaintext))
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Password verification task failed");
            ApiError::internal("Failed to verify credentials")
        })?;
    if !matches {
        tracing::debug!(user_id = user.id, "Login with wrong password");
        return Err(ApiError::unauthorized(INVALID_CREDENTIALS));
    }

    Ok(Json(issue_token(&state, user.id)?))
}
