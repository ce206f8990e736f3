// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Credential verifier.
//!
//! `verify` is a pure function of the token, the current time, the signing
//! key and (optionally) the revocation denylist. It holds no mutable state of
//! its own and is shared between request tasks behind an `Arc`.

use std::sync::Arc;

use chrono::Utc;
use jsonwebtoken::{decode, errors::ErrorKind, Validation};

use super::{
    denylist::Denylist,
    keys::{SigningKey, TOKEN_ALGORITHM},
    AuthError, TokenClaims,
};

pub struct TokenVerifier {
    key: Arc<SigningKey>,
    validation: Validation,
    denylist: Option<Denylist>,
}

impl TokenVerifier {
    pub fn new(key: Arc<SigningKey>) -> Self {
        let mut validation = Validation::new(TOKEN_ALGORITHM);
        // Expiry is exact: a token is valid only while now < exp.
        validation.leeway = 0;
        validation.validate_exp = true;
        validation.validate_aud = false;
        validation.set_required_spec_claims(&["exp", "iat", "sub", "jti"]);

        Self {
            key,
            validation,
            denylist: None,
        }
    }

    /// Consult a denylist during verification.
    pub fn with_denylist(mut self, denylist: Denylist) -> Self {
        self.denylist = Some(denylist);
        self
    }

    /// Validate a token and return its claims.
    pub fn verify(&self, token: &str) -> Result<TokenClaims, AuthError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(AuthError::MalformedToken);
        }

        let data = decode::<TokenClaims>(token, self.key.decoding_key(), &self.validation)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                    AuthError::InvalidSignature
                }
                _ => AuthError::MalformedToken,
            })?;

        let claims = data.claims;

        // The decoder accepts exp == now; we do not.
        if claims.exp <= Utc::now().timestamp() {
            return Err(AuthError::TokenExpired);
        }

        if let Some(denylist) = &self.denylist {
            if denylist.is_revoked(&claims.jti) {
                return Err(AuthError::TokenRevoked);
            }
        }

        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Role;
    use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
    use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};

    const SECRET: &[u8] = b"test-secret-that-is-at-least-32-bytes-long";

    fn verifier() -> TokenVerifier {
        TokenVerifier::new(Arc::new(SigningKey::from_secret(SECRET).unwrap()))
    }

    fn claims_expiring_in(secs: i64) -> TokenClaims {
        let now = Utc::now().timestamp();
        TokenClaims {
            sub: "1".to_string(),
            username: "admin".to_string(),
            role: Role::Admin,
            iat: now,
            exp: now + secs,
            jti: "jti-1".to_string(),
        }
    }

    fn sign(claims: &TokenClaims, secret: &[u8]) -> String {
        encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(secret),
        )
        .unwrap()
    }

    #[test]
    fn valid_token_round_trips_claims() {
        let claims = claims_expiring_in(3600);
        let token = sign(&claims, SECRET);
        assert_eq!(verifier().verify(&token).unwrap(), claims);
    }

    #[test]
    fn expired_token_is_rejected() {
        let token = sign(&claims_expiring_in(-10), SECRET);
        assert!(matches!(
            verifier().verify(&token),
            Err(AuthError::TokenExpired)
        ));
    }

    #[test]
    fn token_expiring_now_is_rejected() {
        let token = sign(&claims_expiring_in(0), SECRET);
        assert!(matches!(
            verifier().verify(&token),
            Err(AuthError::TokenExpired)
        ));
    }

    #[test]
    fn token_signed_with_other_key_is_rejected() {
        let token = sign(
            &claims_expiring_in(3600),
            b"another-secret-that-is-also-32-bytes-long",
        );
        assert!(matches!(
            verifier().verify(&token),
            Err(AuthError::InvalidSignature)
        ));
    }

    #[test]
    fn garbage_is_malformed() {
        assert!(matches!(
            verifier().verify("not-a-jwt"),
            Err(AuthError::MalformedToken)
        ));
        assert!(matches!(
            verifier().verify(""),
            Err(AuthError::MalformedToken)
        ));
    }

    #[test]
    fn unsigned_token_is_rejected() {
        let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"none","typ":"JWT"}"#);
        let claims = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&claims_expiring_in(3600)).unwrap());
        let token = format!("{header}.{claims}.");

        let err = verifier().verify(&token).unwrap_err();
        assert!(matches!(
            err,
            AuthError::MalformedToken | AuthError::InvalidSignature
        ));
    }

    #[test]
    fn unknown_role_is_malformed() {
        let now = Utc::now().timestamp();
        let claims = serde_json::json!({
            "sub": "1", "username": "root", "role": "superuser",
            "iat": now, "exp": now + 3600, "jti": "x"
        });
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap();

        assert!(matches!(
            verifier().verify(&token),
            Err(AuthError::MalformedToken)
        ));
    }

    #[test]
    fn revoked_token_is_rejected() {
        let denylist = Denylist::new();
        let verifier = verifier().with_denylist(denylist.clone());
        let claims = claims_expiring_in(3600);
        let token = sign(&claims, SECRET);

        assert!(verifier.verify(&token).is_ok());
        denylist.revoke(&claims.jti, claims.exp);
        assert!(matches!(
            verifier.verify(&token),
            Err(AuthError::TokenRevoked)
        ));
    }
}
