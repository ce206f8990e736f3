// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication middleware for Axum.
//!
//! Applied with `route_layer` to the protected part of a router:
//!
//! ```rust,ignore
//! let protected = Router::new()
//!     .route("/app/users", get(list_users))
//!     .route_layer(axum::middleware::from_fn_with_state(
//!         verifier.clone(),
//!         require_auth,
//!     ));
//! ```
//!
//! A request without a well-formed `Authorization: Bearer <token>` header is
//! rejected before any network call. Otherwise the token is verified remotely
//! and the resulting [`AuthenticatedUser`] is stored in the request
//! extensions for the [`Auth`](super::Auth) extractor.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::{AuthError, VerifierClient};

/// Extract the bearer token from request headers.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let auth_header = headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingAuthHeader)?
        .to_str()
        .map_err(|_| AuthError::InvalidAuthHeader)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .ok_or(AuthError::InvalidAuthHeader)?;

    if token.is_empty() {
        return Err(AuthError::InvalidAuthHeader);
    }
    Ok(token)
}

/// Authentication middleware function.
pub async fn require_auth(
    State(verifier): State<Arc<VerifierClient>>,
    mut request: Request,
    next: Next,
) -> Response {
    // Owned: the request body is not Sync, so no borrow of it may cross an await.
    let token = match bearer_token(request.headers()) {
        Ok(token) => token.to_string(),
        Err(e) => {
            tracing::debug!(reason = %e, path = %request.uri().path(), "request without usable bearer token");
            return e.into_response();
        }
    };

    match verifier.verify(&token).await {
        Ok(user) => {
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Err(e @ AuthError::VerifierUnavailable(_)) => {
            // Fail closed: same 401 as an invalid token, but logged loudly.
            tracing::warn!(reason = %e, "token verifier unavailable, rejecting request");
            e.into_response()
        }
        Err(e) => {
            tracing::debug!(reason = %e, "token rejected");
            e.into_response()
        }
    }
}
