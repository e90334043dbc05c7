// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Request and response bodies used by the REST API. All types derive
//! `ToSchema` for the OpenAPI document.
//!
//! Request fields default to empty strings when absent so that handlers can
//! answer "All fields are required" instead of a deserialization error.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::storage::StoredTodo;

// =============================================================================
// Account Models
// =============================================================================

/// Request to register a new user.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct RegisterRequest {
    #[schema(example = "Ada Lovelace")]
    pub name: String,
    #[schema(example = "ada@example.com")]
    pub email: String,
    /// At least 8 characters.
    #[schema(example = "password123")]
    pub password: String,
}

/// Request to log in.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct LoginRequest {
    #[schema(example = "ada@example.com")]
    pub email: String,
    #[schema(example = "password123")]
    pub password: String,
}

/// Bearer token returned by register and login.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    pub token: String,
}

// =============================================================================
// To-Do Models
// =============================================================================

/// A to-do item.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct TodoItem {
    pub id: i64,
    /// Owning user.
    pub curator_id: i64,
    pub title: String,
    pub description: String,
}

impl From<StoredTodo> for TodoItem {
    fn from(todo: StoredTodo) -> Self {
        Self {
            id: todo.id,
            curator_id: todo.owner_user_id,
            title: todo.title,
            description: todo.description,
        }
    }
}

/// Body for creating or replacing a to-do item. Both fields are required.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct TodoRequest {
    #[schema(example = "Buy groceries")]
    pub title: String,
    #[schema(example = "Milk, eggs, bread")]
    pub description: String,
}

/// One page of the caller's to-do items.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct TodoPage {
    pub data: Vec<TodoItem>,
    pub page: u32,
    pub limit: u32,
    /// Number of items in `data`.
    pub total: usize,
}
