// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Spawns the three services on ephemeral ports.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use gatekeep::{
    app_service::{self, AppState},
    auth::{PasswordHasher, SigningKey, VerifierClient},
    auth_service::{self, AuthState},
    gateway::{self, GatewayState, ProxyClient, RouteTable},
    server,
    store::{InMemoryUserStore, ResourceDirectory},
};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use url::Url;

pub const SECRET: &[u8] = b"integration-test-secret-0123456789abcdef";

pub struct Stack {
    pub gateway: SocketAddr,
    pub auth: SocketAddr,
    pub app: SocketAddr,
    pub client: reqwest::Client,
    shutdown: CancellationToken,
}

impl Stack {
    pub async fn start() -> Self {
        Self::start_with_ttl(Duration::from_secs(3600)).await
    }

    pub async fn start_with_ttl(token_ttl: Duration) -> Self {
        let shutdown = CancellationToken::new();

        let hasher = Arc::new(PasswordHasher::new(4).unwrap());
        let store = InMemoryUserStore::seeded(&hasher).unwrap();
        let auth_state = AuthState::new(
            Arc::new(store),
            hasher,
            SigningKey::from_secret(SECRET).unwrap(),
            token_ttl,
        );
        let auth = spawn(auth_service::router(auth_state), &shutdown).await;

        let verifier =
            VerifierClient::new(&base_url(auth), Duration::from_secs(2)).unwrap();
        let app = spawn(
            app_service::router(AppState::new(verifier, ResourceDirectory::seeded())),
            &shutdown,
        )
        .await;

        let routes = RouteTable::parse(&format!("/auth=http://{auth},/app=http://{app}")).unwrap();
        let gateway = spawn_gateway(routes, &shutdown).await;

        Self {
            gateway,
            auth,
            app,
            client: reqwest::Client::new(),
            shutdown,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.gateway)
    }

    pub async fn login(&self, username: &str, password: &str) -> reqwest::Response {
        self.client
            .post(self.url("/auth/login"))
            .json(&serde_json::json!({"username": username, "password": password}))
            .send()
            .await
            .unwrap()
    }

    pub async fn token_for(&self, username: &str, password: &str) -> String {
        let response = self.login(username, password).await;
        assert_eq!(response.status(), reqwest::StatusCode::OK);
        let body: serde_json::Value = response.json().await.unwrap();
        body["token"].as_str().unwrap().to_string()
    }

    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }
}

impl Drop for Stack {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

pub fn base_url(addr: SocketAddr) -> Url {
    Url::parse(&format!("http://{addr}")).unwrap()
}

pub async fn spawn(app: Router, shutdown: &CancellationToken) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(server::serve_listener("test", listener, app, shutdown.clone()));
    addr
}

pub async fn spawn_gateway(routes: RouteTable, shutdown: &CancellationToken) -> SocketAddr {
    let proxy = ProxyClient::new(Duration::from_secs(5), 1024 * 1024).unwrap();
    spawn(gateway::router(GatewayState::new(routes, proxy)), shutdown).await
}

/// An address nothing listens on.
pub fn dead_addr() -> SocketAddr {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}
