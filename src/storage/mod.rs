// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Storage Module
//!
//! Persistent storage for users and to-do items in a single embedded redb
//! file (default `./data/todo.redb`, see `DATABASE_PATH`).
//!
//! Repositories borrow the shared [`TodoDatabase`] and each call runs in its
//! own read or write transaction; there is no caching layer.

pub mod database;
pub mod todos;
pub mod users;

pub use database::{DbError, DbResult, TodoDatabase};
pub use todos::{StoredTodo, TodoRepository};
pub use users::{StoredUser, UserRepository};
