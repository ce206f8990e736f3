// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Protected Resource Service
//!
//! Serves mock users and posts. It holds no signing key: every protected
//! request is verified by the auth service through [`VerifierClient`], and
//! any verification failure (including an unreachable auth service) is a 401.
//!
//! ## Routes
//!
//! | Path | Auth |
//! |------|------|
//! | `/health`, `/app/health` | none |
//! | `/app/users`, `/app/posts`, `/app/me` | Bearer |

use std::sync::Arc;

use axum::{middleware, routing::get, Router};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    api::{self, health::HealthResponse},
    auth::{middleware::require_auth, AuthError, AuthenticatedUser, Role, VerificationCache, VerifierClient},
    config::AppServiceConfig,
    models::{Post, PublicUser},
    store::ResourceDirectory,
};

pub mod handlers;

pub const SERVICE_NAME: &str = "app-service";

#[derive(Clone)]
pub struct AppState {
    pub verifier: Arc<VerifierClient>,
    pub directory: Arc<ResourceDirectory>,
}

impl AppState {
    pub fn new(verifier: VerifierClient, directory: ResourceDirectory) -> Self {
        Self {
            verifier: Arc::new(verifier),
            directory: Arc::new(directory),
        }
    }

    /// Build the state with the seeded directory.
    pub fn from_config(config: &AppServiceConfig) -> Result<Self, AuthError> {
        let mut verifier = VerifierClient::new(&config.auth_service_url, config.verify_timeout)?;
        if config.cache_enabled() {
            verifier = verifier.with_cache(VerificationCache::new(config.cache_capacity, config.cache_ttl));
        }
        Ok(Self::new(verifier, ResourceDirectory::seeded()))
    }
}

pub fn router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/app/users", get(handlers::list_users))
        .route("/app/posts", get(handlers::list_posts))
        .route("/app/me", get(handlers::me))
        .route_layer(middleware::from_fn_with_state(
            state.verifier.clone(),
            require_auth,
        ));

    let app = Router::new()
        .route("/health", get(handlers::health))
        .route("/app/health", get(handlers::health))
        .merge(protected)
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()));

    api::with_common_layers(app)
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health,
        handlers::list_users,
        handlers::list_posts,
        handlers::me
    ),
    components(schemas(HealthResponse, PublicUser, Post, AuthenticatedUser, Role)),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Resources", description = "Protected resources")
    )
)]
struct ApiDoc;
