// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Request and response structures used on the wire, plus the user record
//! owned by the auth service. Request bodies default missing fields to empty
//! strings so handlers can answer 400 with a precise message instead of
//! relying on the JSON extractor's rejection.
//!
//! ## Model Categories
//!
//! - **Users**: the auth service's private record and the resource
//!   service's public profile
//! - **Posts**: resource service content
//! - **Auth**: login/verify/logout payloads

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::auth::{AuthenticatedUser, Role};

// =============================================================================
// User Models
// =============================================================================

/// Identity record owned by the auth service.
///
/// Never serialized: outside the auth service a user only exists as claims.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: u64,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}

/// Public user profile served by the resource service.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct PublicUser {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub role: Role,
}

// =============================================================================
// Post Models
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct Post {
    pub id: u64,
    pub title: String,
    pub content: String,
    /// Author's user ID.
    #[serde(rename = "userId")]
    pub user_id: u64,
}

// =============================================================================
// Auth Models
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    /// Username or email address.
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    /// Always `Bearer`.
    pub token_type: String,
    /// Seconds until the token expires.
    pub expires_in: i64,
}

/// Body of `/auth/verify` and `/auth/logout`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct TokenRequest {
    #[serde(default)]
    pub token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct VerifyResponse {
    pub valid: bool,
    pub user: AuthenticatedUser,
}
