// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Auth Boundary Service
//!
//! Owns the signing key and the user store for the lifetime of the process
//! and exposes the session issuer and credential verifier over HTTP.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    routing::{get, post},
    Router,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    api::{self, health::HealthResponse},
    auth::{AuthError, AuthenticatedUser, Denylist, PasswordHasher, Role, SessionIssuer, SigningKey, TokenVerifier},
    config::AuthServiceConfig,
    models::{LoginRequest, LoginResponse, TokenRequest, VerifyResponse},
    store::{InMemoryUserStore, UserStore},
};

pub mod handlers;

pub const SERVICE_NAME: &str = "auth-service";

#[derive(Clone)]
pub struct AuthState {
    pub issuer: Arc<SessionIssuer>,
    pub verifier: Arc<TokenVerifier>,
    pub denylist: Denylist,
}

impl AuthState {
    pub fn new(
        store: Arc<dyn UserStore>,
        hasher: Arc<PasswordHasher>,
        key: SigningKey,
        token_ttl: Duration,
    ) -> Self {
        let key = Arc::new(key);
        let denylist = Denylist::new();
        let issuer = SessionIssuer::new(store, hasher, key.clone(), token_ttl);
        let verifier = TokenVerifier::new(key).with_denylist(denylist.clone());

        Self {
            issuer: Arc::new(issuer),
            verifier: Arc::new(verifier),
            denylist,
        }
    }

    /// Build the state with the seeded in-memory user store.
    pub fn from_config(config: &AuthServiceConfig) -> Result<Self, AuthError> {
        let hasher = Arc::new(PasswordHasher::new(config.bcrypt_cost)?);
        let store = InMemoryUserStore::seeded(&hasher)?;

        Ok(Self::new(
            Arc::new(store),
            hasher,
            config.signing_key.clone(),
            config.token_ttl,
        ))
    }
}

pub fn router(state: AuthState) -> Router {
    let app = Router::new()
        .route("/health", get(handlers::health))
        .route("/auth/health", get(handlers::health))
        .route("/auth/login", post(handlers::login))
        .route("/auth/verify", post(handlers::verify))
        .route("/auth/logout", post(handlers::logout))
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()));

    api::with_common_layers(app)
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health,
        handlers::login,
        handlers::verify,
        handlers::logout
    ),
    components(
        schemas(
            HealthResponse,
            LoginRequest,
            LoginResponse,
            TokenRequest,
            VerifyResponse,
            AuthenticatedUser,
            Role
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Auth", description = "Authentication endpoints")
    )
)]
struct ApiDoc;
