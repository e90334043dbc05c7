// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Embedded database backed by redb (pure Rust, ACID).
//!
//! ## Table Layout
//!
//! - `users`: user_id → serialized StoredUser
//! - `users_by_email`: email → user_id (uniqueness index)
//! - `todos`: todo_id → serialized StoredTodo
//! - `user_todo_index`: composite key (owner_be|todo_id_be) → ()
//! - `sequences`: sequence name → last assigned id

use std::path::Path;

use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition, WriteTransaction};

// =============================================================================
// Table Definitions
// =============================================================================

pub(super) const USERS: TableDefinition<u64, &[u8]> = TableDefinition::new("users");

pub(super) const USERS_BY_EMAIL: TableDefinition<&str, u64> = TableDefinition::new("users_by_email");

pub(super) const TODOS: TableDefinition<u64, &[u8]> = TableDefinition::new("todos");

/// Key format: `owner_id_be | todo_id_be`, so a forward scan over one owner
/// yields their items in ascending id order.
pub(super) const USER_TODO_INDEX: TableDefinition<&[u8], ()> =
    TableDefinition::new("user_todo_index");

const SEQUENCES: TableDefinition<&str, u64> = TableDefinition::new("sequences");

pub(super) const USER_SEQUENCE: &str = "users";
pub(super) const TODO_SEQUENCE: &str = "todos";

// =============================================================================
// Error Type
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("redb database error: {0}")]
    RedbDatabase(#[from] redb::DatabaseError),

    #[error("redb transaction error: {0}")]
    RedbTransaction(#[from] redb::TransactionError),

    #[error("redb table error: {0}")]
    RedbTable(#[from] redb::TableError),

    #[error("redb storage error: {0}")]
    RedbStorage(#[from] redb::StorageError),

    #[error("redb commit error: {0}")]
    RedbCommit(#[from] redb::CommitError),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("already exists: {0}")]
    Duplicate(String),
}

pub type DbResult<T> = Result<T, DbError>;

// =============================================================================
// TodoDatabase
// =============================================================================

/// Embedded ACID database holding users and their to-do items.
pub struct TodoDatabase {
    db: Database,
}

impl TodoDatabase {
    /// Open (or create) the database at the given path.
    pub fn open(path: &Path) -> DbResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let db = Database::create(path)?;

        // Pre-create all tables so later read transactions don't fail
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(USERS)?;
            let _ = write_txn.open_table(USERS_BY_EMAIL)?;
            let _ = write_txn.open_table(TODOS)?;
            let _ = write_txn.open_table(USER_TODO_INDEX)?;
            let _ = write_txn.open_table(SEQUENCES)?;
        }
        write_txn.commit()?;

        tracing::info!(path = %path.display(), "Opened to-do database");
        Ok(Self { db })
    }

    pub(super) fn inner(&self) -> &Database {
        &self.db
    }

    /// Cheap liveness probe: opens a read transaction and a table.
    pub fn ping(&self) -> DbResult<()> {
        let read_txn = self.db.begin_read()?;
        let _ = read_txn.open_table(SEQUENCES)?;
        Ok(())
    }
}

/// Allocate the next id from a named sequence inside an open write transaction.
///
/// Ids start at 1 and are never reused.
pub(super) fn next_id(txn: &WriteTransaction, sequence: &str) -> DbResult<u64> {
    let mut table = txn.open_table(SEQUENCES)?;
    let next = table.get(sequence)?.map(|v| v.value()).unwrap_or(0) + 1;
    table.insert(sequence, next)?;
    Ok(next)
}

/// Build a composite key for the user_todo_index table.
pub(super) fn make_index_key(owner_user_id: u64, todo_id: u64) -> [u8; 16] {
    let mut key = [0u8; 16];
    key[..8].copy_from_slice(&owner_user_id.to_be_bytes());
    key[8..].copy_from_slice(&todo_id.to_be_bytes());
    key
}

/// Extract the todo id portion from a composite index key.
pub(super) fn todo_id_from_key(key: &[u8]) -> Option<u64> {
    let bytes: [u8; 8] = key.get(8..16)?.try_into().ok()?;
    Some(u64::from_be_bytes(bytes))
}

#[cfg(test)]
pub(crate) fn temp_db() -> (TodoDatabase, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let db = TodoDatabase::open(&dir.path().join("test.redb")).unwrap();
    (db, dir)
}
