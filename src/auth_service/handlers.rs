// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};

use super::{AuthState, SERVICE_NAME};
use crate::{
    api::health::{liveness, HealthResponse},
    auth::{AuthError, AuthenticatedUser},
    error::ApiError,
    models::{LoginRequest, LoginResponse, TokenRequest, VerifyResponse},
};

#[utoipa::path(
    get,
    path = "/auth/health",
    tag = "Health",
    responses((status = 200, description = "Service is alive", body = HealthResponse))
)]
pub async fn health() -> Json<HealthResponse> {
    liveness(SERVICE_NAME).await
}

/// Exchange username (or email) and password for a session token.
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    tag = "Auth",
    responses(
        (status = 200, description = "Token issued", body = LoginResponse),
        (status = 400, description = "Missing username or password"),
        (status = 401, description = "Invalid username or password")
    )
)]
pub async fn login(
    State(state): State<AuthState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, ApiError> {
    let Json(request) = body?;

    let issued = match state.issuer.login(&request.username, &request.password).await {
        Ok(issued) => issued,
        Err(e) => {
            if matches!(e, AuthError::InvalidCredentials) {
                tracing::info!(login = %request.username, "login rejected");
            }
            return Err(e.into());
        }
    };

    tracing::info!(
        user_id = %issued.claims.sub,
        role = %issued.claims.role,
        "session issued"
    );

    Ok(Json(LoginResponse {
        token: issued.token,
        token_type: "Bearer".to_string(),
        expires_in: issued.expires_in,
    }))
}

/// Check a token and return the claims it carries.
#[utoipa::path(
    post,
    path = "/auth/verify",
    request_body = TokenRequest,
    tag = "Auth",
    responses(
        (status = 200, description = "Token is valid", body = VerifyResponse),
        (status = 400, description = "Token is required"),
        (status = 401, description = "Invalid or expired token")
    )
)]
pub async fn verify(
    State(state): State<AuthState>,
    body: Result<Json<TokenRequest>, JsonRejection>,
) -> Result<Json<VerifyResponse>, ApiError> {
    let Json(request) = body?;
    let user = verify_token(&state, &request.token)?;

    Ok(Json(VerifyResponse { valid: true, user }))
}

/// Revoke a token for the rest of its lifetime.
#[utoipa::path(
    post,
    path = "/auth/logout",
    request_body = TokenRequest,
    tag = "Auth",
    responses(
        (status = 204, description = "Token revoked"),
        (status = 400, description = "Token is required"),
        (status = 401, description = "Invalid or expired token")
    )
)]
pub async fn logout(
    State(state): State<AuthState>,
    body: Result<Json<TokenRequest>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let Json(request) = body?;
    if request.token.is_empty() {
        return Err(AuthError::MissingToken.into());
    }

    let claims = state.verifier.verify(&request.token).map_err(|e| {
        tracing::debug!(reason = %e, "logout with unacceptable token");
        ApiError::from(e)
    })?;
    state.denylist.revoke(&claims.jti, claims.exp);

    tracing::info!(user_id = %claims.sub, "session revoked");
    Ok(StatusCode::NO_CONTENT)
}

fn verify_token(state: &AuthState, token: &str) -> Result<AuthenticatedUser, AuthError> {
    if token.is_empty() {
        return Err(AuthError::MissingToken);
    }

    state
        .verifier
        .verify(token)
        .and_then(|claims| AuthenticatedUser::from_claims(&claims))
        .inspect_err(|e| tracing::debug!(reason = %e, "token rejected"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use axum::{
        body::{to_bytes, Body},
        http::Request,
        response::Response,
        Router,
    };
    use tower::ServiceExt;

    use crate::{
        auth::{PasswordHasher, SigningKey},
        auth_service::router,
        store::InMemoryUserStore,
    };

    const SECRET: &[u8] = b"test-secret-that-is-long-enough-for-hs256";

    fn app_with_ttl(ttl: Duration) -> Router {
        let hasher = Arc::new(PasswordHasher::new(4).unwrap());
        let store = InMemoryUserStore::seeded(&hasher).unwrap();
        let state = AuthState::new(
            Arc::new(store),
            hasher,
            SigningKey::from_secret(SECRET).unwrap(),
            ttl,
        );
        router(state)
    }

    fn app() -> Router {
        app_with_ttl(Duration::from_secs(3600))
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json_body(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn login_token(app: &Router, username: &str, password: &str) -> String {
        let body = format!(r#"{{"username":"{username}","password":"{password}"}}"#);
        let response = app.clone().oneshot(post_json("/auth/login", &body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        json_body(response).await["token"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn login_issues_bearer_token() {
        let app = app();
        let response = app
            .oneshot(post_json("/auth/login", r#"{"username":"admin","password":"admin123"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["token_type"], "Bearer");
        assert_eq!(body["expires_in"], 3600);
        assert_eq!(body["token"].as_str().unwrap().split('.').count(), 3);
    }

    #[tokio::test]
    async fn login_failures_are_indistinguishable() {
        let app = app();
        let wrong_password = app
            .clone()
            .oneshot(post_json("/auth/login", r#"{"username":"admin","password":"nope"}"#))
            .await
            .unwrap();
        let unknown_user = app
            .oneshot(post_json("/auth/login", r#"{"username":"ghost","password":"admin123"}"#))
            .await
            .unwrap();

        assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(unknown_user.status(), StatusCode::UNAUTHORIZED);
        let a = json_body(wrong_password).await;
        let b = json_body(unknown_user).await;
        assert_eq!(a, b);
        assert_eq!(a["error"], "Invalid username or password");
    }

    #[tokio::test]
    async fn login_requires_both_fields() {
        let response = app()
            .oneshot(post_json("/auth/login", r#"{"username":"admin"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn malformed_json_is_400() {
        let response = app()
            .oneshot(post_json("/auth/login", "{not json"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["error_code"], "bad_request");
    }

    #[tokio::test]
    async fn verify_returns_user_claims() {
        let app = app();
        let token = login_token(&app, "user", "user123").await;

        let response = app
            .oneshot(post_json("/auth/verify", &format!(r#"{{"token":"{token}"}}"#)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            json_body(response).await,
            serde_json::json!({
                "valid": true,
                "user": {"id": 2, "username": "user", "role": "user"}
            })
        );
    }

    #[tokio::test]
    async fn verify_without_token_is_400() {
        let response = app()
            .oneshot(post_json("/auth/verify", "{}"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["error"], "Token is required");
    }

    #[tokio::test]
    async fn verify_rejects_garbage_and_expired_alike() {
        let app = app_with_ttl(Duration::ZERO);
        let expired = login_token(&app, "admin", "admin123").await;

        let expired_response = app
            .clone()
            .oneshot(post_json("/auth/verify", &format!(r#"{{"token":"{expired}"}}"#)))
            .await
            .unwrap();
        let garbage_response = app
            .oneshot(post_json("/auth/verify", r#"{"token":"not.a.jwt"}"#))
            .await
            .unwrap();

        assert_eq!(expired_response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(garbage_response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(json_body(expired_response).await, json_body(garbage_response).await);
    }

    #[tokio::test]
    async fn logout_revokes_token() {
        let app = app();
        let token = login_token(&app, "admin", "admin123").await;
        let body = format!(r#"{{"token":"{token}"}}"#);

        let response = app.clone().oneshot(post_json("/auth/logout", &body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = app.clone().oneshot(post_json("/auth/verify", &body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = app.oneshot(post_json("/auth/logout", &body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn health_on_both_paths() {
        let app = app();
        for uri in ["/health", "/auth/health"] {
            let response = app
                .clone()
                .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
            assert_eq!(json_body(response).await["service"], SERVICE_NAME);
        }
    }
}
