// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! To-do repository.
//!
//! Every operation takes the owner's user id and only ever touches items that
//! owner created. An item owned by someone else is indistinguishable from a
//! missing one.

use chrono::{DateTime, Utc};
use redb::{ReadableDatabase, ReadableTable};
use serde::{Deserialize, Serialize};

use super::database::{
    make_index_key, next_id, todo_id_from_key, DbError, DbResult, TodoDatabase, TODOS,
    TODO_SEQUENCE, USER_TODO_INDEX,
};

/// To-do item as persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoredTodo {
    pub id: i64,
    pub owner_user_id: i64,
    pub title: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Repository for to-do operations, scoped by owner.
pub struct TodoRepository<'a> {
    db: &'a TodoDatabase,
}

impl<'a> TodoRepository<'a> {
    pub fn new(db: &'a TodoDatabase) -> Self {
        Self { db }
    }

    /// Create an item for `owner_user_id`.
    pub fn create(&self, owner_user_id: i64, title: &str, description: &str) -> DbResult<StoredTodo> {
        let write_txn = self.db.inner().begin_write()?;
        let todo = {
            let id = next_id(&write_txn, TODO_SEQUENCE)?;
            let now = Utc::now();
            let todo = StoredTodo {
                id: id as i64,
                owner_user_id,
                title: title.to_string(),
                description: description.to_string(),
                created_at: now,
                updated_at: now,
            };

            let json = serde_json::to_vec(&todo)?;
            let mut todos = write_txn.open_table(TODOS)?;
            todos.insert(id, json.as_slice())?;

            let mut index = write_txn.open_table(USER_TODO_INDEX)?;
            let key = make_index_key(owner_user_id as u64, id);
            index.insert(key.as_slice(), ())?;
            todo
        };
        write_txn.commit()?;
        Ok(todo)
    }

    /// One page of the owner's items in ascending id order.
    pub fn list_page(&self, owner_user_id: i64, offset: usize, limit: usize) -> DbResult<Vec<StoredTodo>> {
        let read_txn = self.db.inner().begin_read()?;
        let index = read_txn.open_table(USER_TODO_INDEX)?;
        let todos = read_txn.open_table(TODOS)?;

        let start = make_index_key(owner_user_id as u64, 0);
        let end = make_index_key(owner_user_id as u64, u64::MAX);

        let mut results = Vec::with_capacity(limit.min(64));
        for entry in index
            .range(start.as_slice()..=end.as_slice())?
            .skip(offset)
            .take(limit)
        {
            let (key, _) = entry?;
            let Some(todo_id) = todo_id_from_key(key.value()) else {
                tracing::warn!("Skipping malformed to-do index key");
                continue;
            };
            match todos.get(todo_id)? {
                Some(value) => results.push(serde_json::from_slice(value.value())?),
                None => tracing::warn!(todo_id, "To-do index entry points at a missing item"),
            }
        }

        Ok(results)
    }

    /// Replace title and description of an owned item.
    pub fn update(
        &self,
        owner_user_id: i64,
        todo_id: i64,
        title: &str,
        description: &str,
    ) -> DbResult<StoredTodo> {
        let write_txn = self.db.inner().begin_write()?;
        let todo = {
            let mut todos = write_txn.open_table(TODOS)?;
            let existing = todos.get(todo_id as u64)?.map(|v| v.value().to_vec());
            let mut todo = owned_todo(existing, owner_user_id, todo_id)?;

            todo.title = title.to_string();
            todo.description = description.to_string();
            todo.updated_at = Utc::now();

            let json = serde_json::to_vec(&todo)?;
            todos.insert(todo_id as u64, json.as_slice())?;
            todo
        };
        write_txn.commit()?;
        Ok(todo)
    }

    /// Delete an owned item.
    pub fn delete(&self, owner_user_id: i64, todo_id: i64) -> DbResult<()> {
        let write_txn = self.db.inner().begin_write()?;
        {
            let mut todos = write_txn.open_table(TODOS)?;
            let existing = todos.get(todo_id as u64)?.map(|v| v.value().to_vec());
            owned_todo(existing, owner_user_id, todo_id)?;
            todos.remove(todo_id as u64)?;

            let mut index = write_txn.open_table(USER_TODO_INDEX)?;
            let key = make_index_key(owner_user_id as u64, todo_id as u64);
            index.remove(key.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }
}

/// Decode a loaded item, treating one owned by somebody else as not found.
fn owned_todo(bytes: Option<Vec<u8>>, owner_user_id: i64, todo_id: i64) -> DbResult<StoredTodo> {
    let not_found = || DbError::NotFound(format!("Todo {todo_id} for user {owner_user_id}"));
    let bytes = bytes.ok_or_else(not_found)?;
    let todo: StoredTodo = serde_json::from_slice(&bytes)?;
    if todo.owner_user_id != owner_user_id {
        return Err(not_found());
    }
    Ok(todo)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::database::temp_db;

    #[test]
    fn create_and_list() {
        let (db, _dir) = temp_db();
        let repo = TodoRepository::new(&db);

        let first = repo.create(1, "Groceries", "Milk, eggs").unwrap();
        let second = repo.create(1, "Laundry", "Whites").unwrap();
        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);

        let listed = repo.list_page(1, 0, 10).unwrap();
        assert_eq!(listed, vec![first, second]);
    }

    #[test]
    fn list_is_scoped_to_owner() {
        let (db, _dir) = temp_db();
        let repo = TodoRepository::new(&db);

        repo.create(1, "Mine", "a").unwrap();
        repo.create(2, "Theirs", "b").unwrap();
        repo.create(1, "Also mine", "c").unwrap();

        let mine = repo.list_page(1, 0, 10).unwrap();
        assert_eq!(mine.len(), 2);
        assert!(mine.iter().all(|t| t.owner_user_id == 1));

        let theirs = repo.list_page(2, 0, 10).unwrap();
        assert_eq!(theirs.len(), 1);
        assert_eq!(theirs[0].title, "Theirs");

        assert!(repo.list_page(3, 0, 10).unwrap().is_empty());
    }

    #[test]
    fn list_pages_in_id_order() {
        let (db, _dir) = temp_db();
        let repo = TodoRepository::new(&db);

        for i in 1..=5 {
            repo.create(1, &format!("Item {i}"), "x").unwrap();
        }

        let ids = |page: Vec<StoredTodo>| page.into_iter().map(|t| t.id).collect::<Vec<_>>();
        assert_eq!(ids(repo.list_page(1, 0, 2).unwrap()), vec![1, 2]);
        assert_eq!(ids(repo.list_page(1, 2, 2).unwrap()), vec![3, 4]);
        assert_eq!(ids(repo.list_page(1, 4, 2).unwrap()), vec![5]);
        assert!(repo.list_page(1, 6, 2).unwrap().is_empty());
    }

    #[test]
    fn update_owned_item() {
        let (db, _dir) = temp_db();
        let repo = TodoRepository::new(&db);

        let todo = repo.create(1, "Old", "old").unwrap();
        let updated = repo.update(1, todo.id, "New", "new").unwrap();
        assert_eq!(updated.title, "New");
        assert_eq!(updated.description, "new");
        assert_eq!(updated.created_at, todo.created_at);

        assert_eq!(repo.list_page(1, 0, 10).unwrap(), vec![updated]);
    }

    #[test]
    fn update_rejects_other_owner_and_missing() {
        let (db, _dir) = temp_db();
        let repo = TodoRepository::new(&db);

        let todo = repo.create(1, "Private", "x").unwrap();
        assert!(matches!(
            repo.update(2, todo.id, "Hijack", "y"),
            Err(DbError::NotFound(_))
        ));
        assert!(matches!(
            repo.update(1, 999, "Ghost", "y"),
            Err(DbError::NotFound(_))
        ));

        assert_eq!(repo.list_page(1, 0, 10).unwrap()[0].title, "Private");
    }

    #[test]
    fn delete_owned_item() {
        let (db, _dir) = temp_db();
        let repo = TodoRepository::new(&db);

        let keep = repo.create(1, "Keep", "x").unwrap();
        let gone = repo.create(1, "Gone", "y").unwrap();

        repo.delete(1, gone.id).unwrap();
        assert_eq!(repo.list_page(1, 0, 10).unwrap(), vec![keep]);

        assert!(matches!(repo.delete(1, gone.id), Err(DbError::NotFound(_))));
    }

    #[test]
    fn delete_rejects_other_owner() {
        let (db, _dir) = temp_db();
        let repo = TodoRepository::new(&db);

        let todo = repo.create(1, "Private", "x").unwrap();
        assert!(matches!(repo.delete(2, todo.id), Err(DbError::NotFound(_))));
        assert_eq!(repo.list_page(1, 0, 10).unwrap().len(), 1);
    }
}
