// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! JWT claims and authenticated user representation.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{roles::Role, AuthError};

/// Claims carried by every token minted by the session issuer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject (user ID, decimal string)
    pub sub: String,

    /// Username at the time of issue
    pub username: String,

    /// User's role
    pub role: Role,

    /// Issued at timestamp
    pub iat: i64,

    /// Expiration timestamp
    pub exp: i64,

    /// Token ID, the revocation denylist key
    pub jti: String,
}

/// Authenticated user information extracted from a verified token.
///
/// This is what `/auth/verify` returns under `user` and what the resource
/// service attaches to the request extensions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AuthenticatedUser {
    /// Numeric user ID
    pub id: u64,

    /// Username
    pub username: String,

    /// User's role
    pub role: Role,
}

impl AuthenticatedUser {
    /// Create from verified token claims.
    ///
    /// A subject that is not a decimal user ID means the token was not
    /// minted by us, so it is reported as malformed.
    pub fn from_claims(claims: &TokenClaims) -> Result<Self, AuthError> {
        let id = claims
            .sub
            .parse::<u64>()
            .map_err(|_| AuthError::MalformedToken)?;

        Ok(Self {
            id,
            username: claims.username.clone(),
            role: claims.role,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_claims() -> TokenClaims {
        TokenClaims {
            sub: "1".to_string(),
            username: "admin".to_string(),
            role: Role::Admin,
            iat: 1700000000,
            exp: 1700003600,
            jti: "2c1f0d0e-7d7b-4c4b-9a38-1f2f6f2e7a11".to_string(),
        }
    }

    #[test]
    fn from_claims_extracts_identity() {
        let user = AuthenticatedUser::from_claims(&sample_claims()).unwrap();
        assert_eq!(user.id, 1);
        assert_eq!(user.username, "admin");
        assert_eq!(user.role, Role::Admin);
    }

    #[test]
    fn from_claims_rejects_non_numeric_subject() {
        let mut claims = sample_claims();
        claims.sub = "user_123".to_string();
        let result = AuthenticatedUser::from_claims(&claims);
        assert!(matches!(result, Err(AuthError::MalformedToken)));
    }

    #[test]
    fn serializes_to_wire_shape() {
        let user = AuthenticatedUser::from_claims(&sample_claims()).unwrap();
        let value = serde_json::to_value(&user).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"id": 1, "username": "admin", "role": "admin"})
        );
    }
}
