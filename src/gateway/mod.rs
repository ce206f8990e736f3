// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Gateway Router
//!
//! Single entry point for clients. Answers its own `/health` and forwards
//! everything else by longest-prefix match on the path:
//!
//! - `/auth/*` → auth service
//! - `/app/*` → resource service
//!
//! The gateway adds no authentication of its own. No match is a 404; a
//! backend that cannot be reached is a 502 with a generic body.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Request, State},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};

use crate::{
    api::{self, health::HealthResponse},
    config::GatewayConfig,
    error::ApiError,
};

pub mod proxy;
pub mod routes;

pub use proxy::{ProxyClient, ProxyError};
pub use routes::{RouteMapping, RouteTable, RouteTableError};

pub const SERVICE_NAME: &str = "api-gateway";

#[derive(Clone)]
pub struct GatewayState {
    pub routes: Arc<RouteTable>,
    pub proxy: Arc<ProxyClient>,
}

impl GatewayState {
    pub fn new(routes: RouteTable, proxy: ProxyClient) -> Self {
        Self {
            routes: Arc::new(routes),
            proxy: Arc::new(proxy),
        }
    }

    pub fn from_config(config: &GatewayConfig) -> Result<Self, ProxyError> {
        let proxy = ProxyClient::new(config.upstream_timeout, config.max_body_bytes)?;
        Ok(Self::new(config.routes.clone(), proxy))
    }
}

pub fn router(state: GatewayState) -> Router {
    let app = Router::new()
        .route("/health", get(health))
        .fallback(forward)
        .with_state(state);

    api::with_common_layers(app)
}

async fn health() -> Json<HealthResponse> {
    api::health::liveness(SERVICE_NAME).await
}

/// Forward a request to the backend owning its path prefix.
async fn forward(State(state): State<GatewayState>, request: Request<Body>) -> Response {
    let path = request.uri().path().to_string();
    let Some(mapping) = state.routes.resolve(&path) else {
        tracing::debug!(path = %path, "no route for path");
        return ApiError::not_found("No route matches the requested path").into_response();
    };

    let target = mapping.target_url(&path, request.uri().query());
    let prefix = mapping.prefix().to_string();

    match state.proxy.forward(request, target.clone()).await {
        Ok(response) => {
            tracing::debug!(
                prefix = %prefix,
                upstream = %target,
                status = %response.status(),
                "proxied request"
            );
            response
        }
        Err(e @ ProxyError::RequestBody { .. }) => {
            ApiError::payload_too_large(e.to_string()).into_response()
        }
        Err(e) => {
            tracing::error!(
                error = %e,
                prefix = %prefix,
                upstream = %target,
                "failed to forward request"
            );
            ApiError::bad_gateway("Upstream service unavailable").into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use axum::{body::to_bytes, http::StatusCode};
    use tower::ServiceExt;

    fn state_with(routes: &str) -> GatewayState {
        GatewayState::new(
            RouteTable::parse(routes).unwrap(),
            ProxyClient::new(Duration::from_secs(2), proxy::DEFAULT_MAX_BODY_BYTES).unwrap(),
        )
    }

    fn dead_upstream() -> String {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        format!("http://{addr}")
    }

    async fn json_body(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_is_answered_locally() {
        let app = router(state_with(&format!("/auth={}", dead_upstream())));
        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], SERVICE_NAME);
    }

    #[tokio::test]
    async fn unmapped_prefix_is_404() {
        let app = router(state_with(&format!("/auth={}", dead_upstream())));
        let response = app
            .oneshot(Request::builder().uri("/billing/invoices").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(json_body(response).await["error_code"], "not_found");
    }

    #[tokio::test]
    async fn silent_backend_is_502_not_a_hang() {
        let silent = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = silent.local_addr().unwrap();
        let state = GatewayState::new(
            RouteTable::parse(&format!("/app=http://{addr}")).unwrap(),
            ProxyClient::new(Duration::from_millis(300), proxy::DEFAULT_MAX_BODY_BYTES).unwrap(),
        );

        let response = tokio::time::timeout(
            Duration::from_secs(5),
            router(state).oneshot(Request::builder().uri("/app/users").body(Body::empty()).unwrap()),
        )
        .await
        .expect("gateway must answer within the upstream timeout")
        .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(json_body(response).await["error_code"], "bad_gateway");
        drop(silent);
    }

    #[tokio::test]
    async fn dot_segments_are_404() {
        let app = router(state_with(&format!("/app={}", dead_upstream())));
        for uri in ["/app/../docs/", "/app/%2e%2e/docs/", "/app/./users"] {
            let response = app
                .clone()
                .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::NOT_FOUND, "{uri}");
        }
    }

    #[tokio::test]
    async fn dead_backend_is_502() {
        let app = router(state_with(&format!("/auth={}", dead_upstream())));
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/auth/login")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"username":"admin","password":"admin123"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let body = json_body(response).await;
        assert_eq!(body["error_code"], "bad_gateway");
        assert_eq!(body["error"], "Upstream service unavailable");
    }
}
