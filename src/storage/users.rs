// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User repository.
//!
//! Users are keyed by a sequential positive id. Emails are unique, enforced
//! through the `users_by_email` index inside the same write transaction.

use chrono::{DateTime, Utc};
use redb::{ReadableDatabase, ReadableTable};
use serde::{Deserialize, Serialize};

use super::database::{
    next_id, DbError, DbResult, TodoDatabase, USERS, USERS_BY_EMAIL, USER_SEQUENCE,
};

/// User record as persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoredUser {
    pub id: i64,
    pub name: String,
    pub email: String,
    /// Argon2 PHC string; never leaves the server
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Repository for user operations.
pub struct UserRepository<'a> {
    db: &'a TodoDatabase,
}

impl<'a> UserRepository<'a> {
    pub fn new(db: &'a TodoDatabase) -> Self {
        Self { db }
    }

    /// Create a user, assigning a fresh id.
    ///
    /// Fails with [`DbError::Duplicate`] if the email is already registered.
    pub fn create(&self, name: &str, email: &str, password_hash: &str) -> DbResult<StoredUser> {
        let write_txn = self.db.inner().begin_write()?;
        let user = {
            let mut by_email = write_txn.open_table(USERS_BY_EMAIL)?;
            if by_email.get(email)?.is_some() {
                return Err(DbError::Duplicate(format!("User with email {email}")));
            }

            let id = next_id(&write_txn, USER_SEQUENCE)?;
            let user = StoredUser {
                id: id as i64,
                name: name.to_string(),
                email: email.to_string(),
                password_hash: password_hash.to_string(),
                created_at: Utc::now(),
            };

            let json = serde_json::to_vec(&user)?;
            let mut users = write_txn.open_table(USERS)?;
            users.insert(id, json.as_slice())?;
            by_email.insert(email, id)?;
            user
        };
        write_txn.commit()?;
        Ok(user)
    }

    /// Look up a user by email (exact match).
    pub fn find_by_email(&self, email: &str) -> DbResult<Option<StoredUser>> {
        let read_txn = self.db.inner().begin_read()?;
        let by_email = read_txn.open_table(USERS_BY_EMAIL)?;
        let Some(id) = by_email.get(email)?.map(|v| v.value()) else {
            return Ok(None);
        };

        let users = read_txn.open_table(USERS)?;
        match users.get(id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Err(DbError::NotFound(format!("User {id} indexed by email"))),
        }
    }

    /// Get a user by id.
    pub fn get(&self, user_id: i64) -> DbResult<Option<StoredUser>> {
        if user_id <= 0 {
            return Ok(None);
        }
        let read_txn = self.db.inner().begin_read()?;
        let users = read_txn.open_table(USERS)?;
        match users.get(user_id as u64)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }
}
