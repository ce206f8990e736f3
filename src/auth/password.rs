// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Password hashing via bcrypt.

use std::sync::Arc;

use super::AuthError;

/// Default bcrypt cost factor.
pub const DEFAULT_BCRYPT_COST: u32 = 10;

/// bcrypt hasher with a fixed cost.
///
/// Holds a dummy hash of the same cost so that a login for an unknown user
/// performs the same amount of work as one with a wrong password.
pub struct PasswordHasher {
    cost: u32,
    dummy_hash: Arc<str>,
}

impl PasswordHasher {
    /// Create a hasher. Fails if bcrypt rejects the cost (valid range is 4..=31).
    pub fn new(cost: u32) -> Result<Self, AuthError> {
        let dummy_hash = bcrypt::hash("dummy-password-for-unknown-users", cost)
            .map_err(|e| AuthError::Internal(format!("bcrypt hash: {e}")))?;
        Ok(Self {
            cost,
            dummy_hash: dummy_hash.into(),
        })
    }

    /// Hash a password (blocking; used when seeding users at startup).
    pub fn hash(&self, password: &str) -> Result<String, AuthError> {
        bcrypt::hash(password, self.cost)
            .map_err(|e| AuthError::Internal(format!("bcrypt hash: {e}")))
    }

    /// Verify a password against a stored hash on the blocking pool.
    ///
    /// `None` means there is no such user: the dummy hash is checked instead
    /// and the result is always `false`.
    pub async fn verify(&self, password: &str, hash: Option<&str>) -> Result<bool, AuthError> {
        let known = hash.is_some();
        let target: Arc<str> = match hash {
            Some(h) => h.into(),
            None => self.dummy_hash.clone(),
        };
        let password = password.to_string();

        let matched = tokio::task::spawn_blocking(move || bcrypt::verify(password, &target))
            .await
            .map_err(|e| AuthError::Internal(format!("bcrypt task: {e}")))?
            .map_err(|e| AuthError::Internal(format!("bcrypt verify: {e}")))?;

        Ok(known && matched)
    }
}
