// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! HTTP client for forwarding requests to backends.
//!
//! Method, query, headers and body go upstream unchanged except for
//! hop-by-hop headers; the upstream status, headers and body come back
//! unchanged on the same terms. There are no retries.

use std::time::Duration;

use axum::{
    body::Body,
    http::{header, HeaderMap, HeaderName, Request, Response},
};
use url::Url;

/// Default upstream timeout (10 seconds).
pub const DEFAULT_UPSTREAM_TIMEOUT: Duration = Duration::from_secs(10);

/// Default request body cap (2 MiB).
pub const DEFAULT_MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

/// Headers that describe a single connection and must not be forwarded.
const HOP_BY_HOP: [HeaderName; 8] = [
    header::CONNECTION,
    header::PROXY_AUTHENTICATE,
    header::PROXY_AUTHORIZATION,
    header::TE,
    header::TRAILER,
    header::TRANSFER_ENCODING,
    header::UPGRADE,
    header::HOST,
];

#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    #[error("request body exceeds {limit} bytes or could not be read")]
    RequestBody { limit: usize },
    #[error("upstream request timed out")]
    Timeout,
    #[error("upstream request failed: {0}")]
    Upstream(String),
    #[error("failed to build response: {0}")]
    Response(String),
}

/// Forwarding client shared by all gateway requests.
pub struct ProxyClient {
    client: reqwest::Client,
    max_body_bytes: usize,
}

impl ProxyClient {
    pub fn new(timeout: Duration, max_body_bytes: usize) -> Result<Self, ProxyError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .tcp_keepalive(Duration::from_secs(30))
            .pool_idle_timeout(Duration::from_secs(90))
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| ProxyError::Upstream(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            max_body_bytes,
        })
    }

    /// Forward `request` to `target` and return the upstream response.
    pub async fn forward(
        &self,
        request: Request<Body>,
        target: Url,
    ) -> Result<Response<Body>, ProxyError> {
        let (parts, body) = request.into_parts();
        let body_bytes = axum::body::to_bytes(body, self.max_body_bytes)
            .await
            .map_err(|_| ProxyError::RequestBody {
                limit: self.max_body_bytes,
            })?;

        let mut upstream_request = self
            .client
            .request(parts.method, target)
            .headers(forwardable_headers(&parts.headers));
        if !body_bytes.is_empty() {
            upstream_request = upstream_request.body(body_bytes);
        }

        let upstream_response = upstream_request.send().await.map_err(|e| {
            if e.is_timeout() {
                ProxyError::Timeout
            } else {
                ProxyError::Upstream(e.to_string())
            }
        })?;

        let status = upstream_response.status();
        let headers = forwardable_headers(upstream_response.headers());
        let body = upstream_response
            .bytes()
            .await
            .map_err(|e| ProxyError::Upstream(e.to_string()))?;

        let mut response = Response::builder()
            .status(status)
            .body(Body::from(body))
            .map_err(|e| ProxyError::Response(e.to_string()))?;
        *response.headers_mut() = headers;
        Ok(response)
    }
}

/// Copy of `headers` without hop-by-hop headers, headers named by
/// `Connection`, and `Content-Length` (recomputed from the buffered body).
fn forwardable_headers(headers: &HeaderMap) -> HeaderMap {
    let connection_listed: Vec<String> = headers
        .get_all(header::CONNECTION)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .map(|name| name.trim().to_ascii_lowercase())
        .collect();

    let mut forwarded = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        if HOP_BY_HOP.contains(name)
            || name == header::CONTENT_LENGTH
            || name.as_str() == "keep-alive"
            || connection_listed.iter().any(|listed| listed == name.as_str())
        {
            continue;
        }
        forwarded.append(name.clone(), value.clone());
    }
    forwarded
}
