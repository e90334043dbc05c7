// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::auth::TokenService;
use crate::storage::TodoDatabase;

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<TodoDatabase>,
    pub tokens: Arc<TokenService>,
}

impl AppState {
    pub fn new(db: TodoDatabase, tokens: TokenService) -> Self {
        Self {
            db: Arc::new(db),
            tokens: Arc::new(tokens),
        }
    }
}

#[cfg(test)]
pub(crate) const TEST_SECRET: &str = "test-signing-secret";

/// State backed by a throwaway database and a configured token service.
#[cfg(test)]
pub(crate) fn test_state() -> (AppState, tempfile::TempDir) {
    let (db, dir) = crate::storage::database::temp_db();
    let tokens = TokenService::new(crate::auth::AuthConfig::new(TEST_SECRET));
    (AppState::new(db, tokens), dir)
}
