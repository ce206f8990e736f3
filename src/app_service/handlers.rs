// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{extract::State, Json};

use super::{AppState, SERVICE_NAME};
use crate::{
    api::health::{liveness, HealthResponse},
    auth::{Auth, AuthenticatedUser},
    models::{Post, PublicUser},
};

#[utoipa::path(
    get,
    path = "/app/health",
    tag = "Health",
    responses((status = 200, description = "Service is alive", body = HealthResponse))
)]
pub async fn health() -> Json<HealthResponse> {
    liveness(SERVICE_NAME).await
}

#[utoipa::path(
    get,
    path = "/app/users",
    tag = "Resources",
    responses(
        (status = 200, body = Vec<PublicUser>),
        (status = 401, description = "Missing, invalid or unverifiable token")
    )
)]
pub async fn list_users(State(state): State<AppState>) -> Json<Vec<PublicUser>> {
    Json(state.directory.list_users())
}

#[utoipa::path(
    get,
    path = "/app/posts",
    tag = "Resources",
    responses(
        (status = 200, body = Vec<Post>),
        (status = 401, description = "Missing, invalid or unverifiable token")
    )
)]
pub async fn list_posts(State(state): State<AppState>) -> Json<Vec<Post>> {
    Json(state.directory.list_posts())
}

/// Claims of the caller, as verified by the auth service.
#[utoipa::path(
    get,
    path = "/app/me",
    tag = "Resources",
    responses(
        (status = 200, body = AuthenticatedUser),
        (status = 401, description = "Missing, invalid or unverifiable token")
    )
)]
pub async fn me(Auth(user): Auth) -> Json<AuthenticatedUser> {
    Json(user)
}
