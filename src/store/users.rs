// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User store interface and the in-memory implementation.

use async_trait::async_trait;

use super::{StoreError, StoreResult};
use crate::auth::{AuthError, PasswordHasher, Role};
use crate::models::User;

/// Lookup operations the session issuer needs.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Find a user whose username OR email equals `login` (case-sensitive).
    async fn find_user_by_username_or_email(&self, login: &str) -> StoreResult<Option<User>>;

    async fn count_users(&self) -> StoreResult<usize>;
}

/// In-memory user table. Built at startup, read-only afterwards.
#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    users: Vec<User>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store with the two demo accounts (`admin`/`admin123`, `user`/`user123`).
    pub fn seeded(hasher: &PasswordHasher) -> Result<Self, AuthError> {
        let mut store = Self::new();
        let seeds = [
            (1, "admin", "admin@example.com", "admin123", Role::Admin),
            (2, "user", "user@example.com", "user123", Role::User),
        ];

        for (id, username, email, password, role) in seeds {
            store
                .insert(User {
                    id,
                    username: username.to_string(),
                    email: email.to_string(),
                    password_hash: hasher.hash(password)?,
                    role,
                })
                .map_err(|e| AuthError::Internal(e.to_string()))?;
        }

        Ok(store)
    }

    /// Add a user, enforcing unique id, username and email.
    pub fn insert(&mut self, user: User) -> StoreResult<()> {
        for existing in &self.users {
            if existing.id == user.id {
                return Err(StoreError::Conflict {
                    field: "id",
                    value: user.id.to_string(),
                });
            }
            if existing.username == user.username {
                return Err(StoreError::Conflict {
                    field: "username",
                    value: user.username,
                });
            }
            if existing.email == user.email {
                return Err(StoreError::Conflict {
                    field: "email",
                    value: user.email,
                });
            }
        }
        self.users.push(user);
        Ok(())
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_user_by_username_or_email(&self, login: &str) -> StoreResult<Option<User>> {
        Ok(self
            .users
            .iter()
            .find(|u| u.username == login || u.email == login)
            .cloned())
    }

    async fn count_users(&self) -> StoreResult<usize> {
        Ok(self.users.len())
    }
}
