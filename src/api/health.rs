// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Liveness probe response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Always "ok" while the process is serving.
    pub status: String,
    /// Name of the answering service.
    pub service: String,
    /// Time the probe was answered (RFC 3339).
    pub timestamp: DateTime<Utc>,
}

impl HealthResponse {
    pub fn ok(service: &str) -> Self {
        Self {
            status: "ok".to_string(),
            service: service.to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// Liveness probe handler.
///
/// Always returns 200 if the process is running. Does not check
/// dependencies: a gateway with every backend down is still alive.
pub async fn liveness(service: &'static str) -> Json<HealthResponse> {
    Json(HealthResponse::ok(service))
}
