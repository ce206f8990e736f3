// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Gatekeep - Token-Authenticated Service Gateway
//!
//! Three cooperating HTTP services: a gateway that forwards by path prefix,
//! an auth service that issues and verifies HS256 session tokens, and a
//! resource service whose routes are protected by remote verification.
//!
//! ## Modules
//!
//! - `gateway` - Prefix route table and forwarding proxy
//! - `auth_service` - Login, verify and logout endpoints
//! - `app_service` - Protected users/posts endpoints
//! - `auth` - Tokens, password hashing, verification and middleware
//! - `store` - User store trait and in-memory data
//! - `config` / `telemetry` / `server` - Startup plumbing

pub mod api;
pub mod app_service;
pub mod auth;
pub mod auth_service;
pub mod config;
pub mod error;
pub mod gateway;
pub mod models;
pub mod server;
pub mod store;
pub mod telemetry;
