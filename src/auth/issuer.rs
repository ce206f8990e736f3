// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Session issuer: username/password login and token minting.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use jsonwebtoken::{encode, Header};
use uuid::Uuid;

use super::{
    keys::{SigningKey, TOKEN_ALGORITHM},
    AuthError, PasswordHasher, TokenClaims,
};
use crate::models::User;
use crate::store::UserStore;

/// Default token lifetime (1 hour).
pub const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(3600);

/// A freshly minted token and the claims it carries.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub claims: TokenClaims,
    pub expires_in: i64,
}

pub struct SessionIssuer {
    store: Arc<dyn UserStore>,
    hasher: Arc<PasswordHasher>,
    key: Arc<SigningKey>,
    ttl: Duration,
}

impl SessionIssuer {
    pub fn new(
        store: Arc<dyn UserStore>,
        hasher: Arc<PasswordHasher>,
        key: Arc<SigningKey>,
        ttl: Duration,
    ) -> Self {
        Self {
            store,
            hasher,
            key,
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Number of users that can log in.
    pub async fn known_users(&self) -> Result<usize, AuthError> {
        self.store
            .count_users()
            .await
            .map_err(|e| AuthError::Internal(format!("user count: {e}")))
    }

    /// Authenticate by username (or email) and password.
    ///
    /// Unknown user and wrong password both return
    /// [`AuthError::InvalidCredentials`] after the same bcrypt work.
    pub async fn login(&self, username: &str, password: &str) -> Result<IssuedToken, AuthError> {
        if username.is_empty() || password.is_empty() {
            return Err(AuthError::MissingCredentials);
        }

        let user = self
            .store
            .find_user_by_username_or_email(username)
            .await
            .map_err(|e| AuthError::Internal(format!("user lookup: {e}")))?;

        let matched = self
            .hasher
            .verify(password, user.as_ref().map(|u| u.password_hash.as_str()))
            .await?;

        match user {
            Some(user) if matched => self.mint(&user),
            _ => Err(AuthError::InvalidCredentials),
        }
    }

    /// Sign a token for `user` expiring `ttl` from now.
    pub fn mint(&self, user: &User) -> Result<IssuedToken, AuthError> {
        let now = Utc::now().timestamp();
        let expires_in = i64::try_from(self.ttl.as_secs())
            .map_err(|_| AuthError::Internal("token ttl out of range".to_string()))?;

        let claims = TokenClaims {
            sub: user.id.to_string(),
            username: user.username.clone(),
            role: user.role,
            iat: now,
            exp: now
                .checked_add(expires_in)
                .ok_or_else(|| AuthError::Internal("token expiry out of range".to_string()))?,
            jti: Uuid::new_v4().to_string(),
        };

        let token = encode(
            &Header::new(TOKEN_ALGORITHM),
            &claims,
            self.key.encoding_key(),
        )
        .map_err(|e| AuthError::Internal(format!("jwt encode: {e}")))?;

        Ok(IssuedToken {
            token,
            claims,
            expires_in,
        })
    }
}
