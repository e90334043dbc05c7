// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! To-do endpoints. Every handler here sits behind the authorization gate
//! and scopes all storage access to the caller's user id.

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use utoipa::IntoParams;

use super::users::json_body;
use crate::{
    auth::Auth,
    error::ApiError,
    models::{TodoItem, TodoPage, TodoRequest},
    state::AppState,
    storage::{DbError, TodoRepository},
};

const DEFAULT_PAGE: u32 = 1;
const DEFAULT_LIMIT: u32 = 10;

/// Pagination parameters. Missing, non-numeric or non-positive values fall
/// back to the defaults instead of failing the request, and a repeated key
/// keeps its first value.
#[derive(Debug, Default, IntoParams)]
pub struct ListTodosQuery {
    /// 1-based page number (default 1).
    pub page: Option<String>,
    /// Items per page (default 10).
    pub limit: Option<String>,
}

impl ListTodosQuery {
    /// Build from raw query pairs. A repeated key keeps its first value.
    fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut query = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "page" => &mut query.page,
                "limit" => &mut query.limit,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }
        query
    }

    fn resolve(&self) -> (u32, u32) {
        (
            positive_or(self.page.as_deref(), DEFAULT_PAGE),
            positive_or(self.limit.as_deref(), DEFAULT_LIMIT),
        )
    }
}

fn positive_or(raw: Option<&str>, default: u32) -> u32 {
    raw.and_then(|v| v.trim().parse::<u32>().ok())
        .filter(|v| *v >= 1)
        .unwrap_or(default)
}

fn parse_todo_id(raw: &str) -> Result<i64, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::bad_request("Invalid todo ID format. Must be an integer."))
}

fn validate(request: &TodoRequest) -> Result<(), ApiError> {
    if request.title.is_empty() || request.description.is_empty() {
        return Err(ApiError::bad_request("All fields are required"));
    }
    Ok(())
}

/// Missing and foreign items are indistinguishable to the caller.
fn not_owned(e: DbError) -> ApiError {
    match e {
        DbError::NotFound(_) => ApiError::forbidden("Todo not found"),
        other => other.into(),
    }
}

#[utoipa::path(
    post,
    path = "/todos",
    request_body = TodoRequest,
    tag = "Todos",
    security(("bearer" = [])),
    responses(
        (status = 201, body = TodoItem),
        (status = 400, description = "Missing fields or malformed body"),
        (status = 401, description = "Missing or invalid token")
    )
)]
pub async fn create_todo(
    Auth(identity): Auth,
    State(state): State<AppState>,
    payload: Result<Json<TodoRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<TodoItem>), ApiError> {
    let request = json_body(payload)?;
    validate(&request)?;

    let todo = TodoRepository::new(&state.db).create(
        identity.user_id,
        &request.title,
        &request.description,
    )?;

    tracing::debug!(user_id = identity.user_id, todo_id = todo.id, "To-do created");
    Ok((StatusCode::CREATED, Json(todo.into())))
}

#[utoipa::path(
    get,
    path = "/todos",
    params(ListTodosQuery),
    tag = "Todos",
    security(("bearer" = [])),
    responses(
        (status = 200, body = TodoPage),
        (status = 401, description = "Missing or invalid token")
    )
)]
pub async fn list_todos(
    Auth(identity): Auth,
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<TodoPage>, ApiError> {
    let (page, limit) = ListTodosQuery::from_pairs(pairs).resolve();
    let offset = (page as usize - 1).saturating_mul(limit as usize);

    let data: Vec<TodoItem> = TodoRepository::new(&state.db)
        .list_page(identity.user_id, offset, limit as usize)?
        .into_iter()
        .map(Into::into)
        .collect();

    Ok(Json(TodoPage {
        total: data.len(),
        data,
        page,
        limit,
    }))
}

#[utoipa::path(
    put,
    path = "/todos/{todo_id}",
    params(("todo_id" = i64, Path, description = "Identifier of the to-do item")),
    request_body = TodoRequest,
    tag = "Todos",
    security(("bearer" = [])),
    responses(
        (status = 200, body = TodoItem),
        (status = 400, description = "Bad id, missing fields or malformed body"),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Todo not found")
    )
)]
pub async fn update_todo(
    Auth(identity): Auth,
    State(state): State<AppState>,
    Path(todo_id): Path<String>,
    payload: Result<Json<TodoRequest>, JsonRejection>,
) -> Result<Json<TodoItem>, ApiError> {
    let todo_id = parse_todo_id(&todo_id)?;
    let request = json_body(payload)?;
    validate(&request)?;

    let todo = TodoRepository::new(&state.db)
        .update(identity.user_id, todo_id, &request.title, &request.description)
        .map_err(not_owned)?;

    Ok(Json(todo.into()))
}

#[utoipa::path(
    delete,
    path = "/todos/{todo_id}",
    params(("todo_id" = i64, Path, description = "Identifier of the to-do item")),
    tag = "Todos",
    security(("bearer" = [])),
    responses(
        (status = 204),
        (status = 400, description = "Bad id"),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Todo not found")
    )
)]
pub async fn delete_todo(
    Auth(identity): Auth,
    State(state): State<AppState>,
    Path(todo_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let todo_id = parse_todo_id(&todo_id)?;

    TodoRepository::new(&state.db)
        .delete(identity.user_id, todo_id)
        .map_err(not_owned)?;

    tracing::debug!(user_id = identity.user_id, todo_id, "To-do deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// `PUT`/`DELETE /todos/` with an empty id segment.
pub async fn missing_todo_id(Auth(_identity): Auth) -> ApiError {
    ApiError::bad_request("Todo ID missing in URL path")
}
