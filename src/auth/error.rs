// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication errors.
//!
//! The `Display` text of each variant is the detailed reason and is meant for
//! logs. Clients only ever see [`AuthError::public_message`], which collapses
//! every token failure into one message so a caller cannot tell an expired
//! token from a forged one.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::error::ApiError;

/// Authentication error type.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No authorization header present
    #[error("Authorization header is required")]
    MissingAuthHeader,
    /// Invalid authorization header format
    #[error("Invalid authorization header format (expected 'Bearer <token>')")]
    InvalidAuthHeader,
    /// Login body without username or password
    #[error("Username and password are required")]
    MissingCredentials,
    /// Verify/logout body without a token
    #[error("Token is required")]
    MissingToken,
    /// Unknown user or wrong password (deliberately not distinguished)
    #[error("Invalid username or password")]
    InvalidCredentials,
    /// Token is malformed
    #[error("Token is malformed")]
    MalformedToken,
    /// Token signature is invalid
    #[error("Token signature is invalid")]
    InvalidSignature,
    /// Token has expired
    #[error("Token has expired")]
    TokenExpired,
    /// Token ID is on the denylist
    #[error("Token has been revoked")]
    TokenRevoked,
    /// The remote verifier answered with a rejection
    #[error("Token was rejected by the auth service")]
    TokenRejected,
    /// The remote verifier could not be reached or answered garbage
    #[error("Token verifier unavailable: {0}")]
    VerifierUnavailable(String),
    /// Internal error
    #[error("Internal authentication error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Whether this error means "the presented token is not acceptable".
    ///
    /// Verifier unavailability counts: the resource boundary fails closed.
    pub fn is_token_rejection(&self) -> bool {
        matches!(
            self,
            AuthError::MalformedToken
                | AuthError::InvalidSignature
                | AuthError::TokenExpired
                | AuthError::TokenRevoked
                | AuthError::TokenRejected
                | AuthError::VerifierUnavailable(_)
        )
    }

    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::MissingAuthHeader => "missing_auth_header",
            AuthError::InvalidAuthHeader => "invalid_auth_header",
            AuthError::MissingCredentials | AuthError::MissingToken => "bad_request",
            AuthError::InvalidCredentials => "invalid_credentials",
            AuthError::Internal(_) => "internal_error",
            _ => "invalid_token",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::MissingCredentials | AuthError::MissingToken => StatusCode::BAD_REQUEST,
            AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::UNAUTHORIZED,
        }
    }

    /// Message safe to send to the client.
    pub fn public_message(&self) -> String {
        match self {
            e if e.is_token_rejection() => "Invalid or expired token".to_string(),
            AuthError::Internal(_) => "Internal server error".to_string(),
            other => other.to_string(),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Internal(detail) => ApiError::internal(format!("authentication: {detail}")),
            err => ApiError::new(err.status_code(), err.error_code(), err.public_message()),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        ApiError::from(self).into_response()
    }
}
