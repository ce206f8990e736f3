// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Remote credential verification.
//!
//! The resource service does not hold the signing key. Every protected
//! request is verified by calling the auth service's `/auth/verify`
//! endpoint, optionally short-circuited by a [`VerificationCache`].
//!
//! ## Failure mapping
//!
//! - 200 with `valid: true` → user claims
//! - 400 / 401, or 200 with `valid: false` → [`AuthError::TokenRejected`]
//! - anything else, connection errors and timeouts →
//!   [`AuthError::VerifierUnavailable`]

use std::time::Duration;

use reqwest::StatusCode;
use serde::Deserialize;
use url::Url;

use super::{cache::VerificationCache, AuthError, AuthenticatedUser};
use crate::models::{TokenRequest, VerifyResponse};

/// Default verification timeout (2 seconds).
pub const DEFAULT_VERIFY_TIMEOUT: Duration = Duration::from_secs(2);

/// Path of the verification endpoint on the auth service.
pub const VERIFY_PATH: &str = "/auth/verify";

/// Just enough of the token payload to bound a cache entry.
#[derive(Deserialize)]
struct ExpiryOnly {
    exp: i64,
}

/// HTTP client for the auth service's verify endpoint.
pub struct VerifierClient {
    verify_url: Url,
    client: reqwest::Client,
    cache: Option<VerificationCache>,
}

impl VerifierClient {
    /// Create a client for the auth service at `auth_base_url`.
    ///
    /// A path on the base URL is kept: `http://gw/internal` verifies at
    /// `http://gw/internal/auth/verify`.
    pub fn new(auth_base_url: &Url, timeout: Duration) -> Result<Self, AuthError> {
        let mut base = auth_base_url.clone();
        if !base.path().ends_with('/') {
            base.set_path(&format!("{}/", base.path()));
        }
        let verify_url = base
            .join(VERIFY_PATH.trim_start_matches('/'))
            .map_err(|e| AuthError::Internal(format!("invalid auth service URL: {e}")))?;
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AuthError::Internal(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            verify_url,
            client,
            cache: None,
        })
    }

    /// Put a verification cache in front of the remote call.
    pub fn with_cache(mut self, cache: VerificationCache) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn verify_url(&self) -> &Url {
        &self.verify_url
    }

    /// Verify a bearer token with the auth service.
    pub async fn verify(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        if let Some(user) = self.cache.as_ref().and_then(|c| c.get(token)) {
            return Ok(user);
        }

        let response = self
            .client
            .post(self.verify_url.clone())
            .json(&TokenRequest {
                token: token.to_string(),
            })
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AuthError::VerifierUnavailable("verification timed out".to_string())
                } else {
                    AuthError::VerifierUnavailable(e.to_string())
                }
            })?;

        match response.status() {
            StatusCode::OK => {}
            StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED => {
                return Err(AuthError::TokenRejected)
            }
            status => {
                return Err(AuthError::VerifierUnavailable(format!(
                    "HTTP {status} from verifier"
                )))
            }
        }

        let body: VerifyResponse = response
            .json()
            .await
            .map_err(|e| AuthError::VerifierUnavailable(format!("invalid verifier response: {e}")))?;

        if !body.valid {
            return Err(AuthError::TokenRejected);
        }

        if let Some(cache) = &self.cache {
            // The signature was checked by the auth service; we only need exp.
            if let Ok(data) = jsonwebtoken::dangerous::insecure_decode::<ExpiryOnly>(token) {
                cache.put(token, body.user.clone(), data.claims.exp);
            }
        }

        Ok(body.user)
    }
}
