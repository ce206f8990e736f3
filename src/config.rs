// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Each binary reads its configuration from the environment once at startup.
//! Any missing required value or unparsable value is a startup failure.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `GATEWAY_PORT` | Gateway bind port | `3000` |
//! | `AUTH_PORT` | Auth service bind port | `3001` |
//! | `APP_PORT` | Resource service bind port | `3002` |
//! | `JWT_SECRET` | HS256 signing secret (auth service) | Required, at least 32 bytes |
//! | `TOKEN_TTL_SECS` | Session token lifetime, at most one year | `3600` |
//! | `BCRYPT_COST` | bcrypt cost factor (4-31) | `10` |
//! | `AUTH_SERVICE_URL` | Base URL of the auth service | `http://127.0.0.1:3001` |
//! | `APP_SERVICE_URL` | Base URL of the resource service | `http://127.0.0.1:3002` |
//! | `VERIFY_TIMEOUT_MS` | Remote verification timeout | `2000` |
//! | `VERIFY_CACHE_TTL_SECS` | Verification cache TTL, `0` disables | `0` |
//! | `VERIFY_CACHE_CAPACITY` | Verification cache entries | `1024` |
//! | `GATEWAY_ROUTES` | `prefix=upstream[;rewrite]`, comma-separated | Derived from the service URLs |
//! | `GATEWAY_UPSTREAM_TIMEOUT_SECS` | Upstream request timeout | `10` |
//! | `GATEWAY_MAX_BODY_BYTES` | Request body cap | `2097152` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::fmt::Display;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use url::Url;

use crate::auth::{keys::KeyError, SigningKey};
use crate::gateway::{RouteMapping, RouteTable, RouteTableError};

pub const HOST_ENV: &str = "HOST";
pub const GATEWAY_PORT_ENV: &str = "GATEWAY_PORT";
pub const AUTH_PORT_ENV: &str = "AUTH_PORT";
pub const APP_PORT_ENV: &str = "APP_PORT";

/// Environment variable holding the token signing secret.
///
/// Only the auth service reads it. The resource service and the gateway
/// never see the key.
pub const JWT_SECRET_ENV: &str = "JWT_SECRET";
pub const TOKEN_TTL_SECS_ENV: &str = "TOKEN_TTL_SECS";
pub const BCRYPT_COST_ENV: &str = "BCRYPT_COST";

pub const AUTH_SERVICE_URL_ENV: &str = "AUTH_SERVICE_URL";
pub const APP_SERVICE_URL_ENV: &str = "APP_SERVICE_URL";

pub const VERIFY_TIMEOUT_MS_ENV: &str = "VERIFY_TIMEOUT_MS";
pub const VERIFY_CACHE_TTL_SECS_ENV: &str = "VERIFY_CACHE_TTL_SECS";
pub const VERIFY_CACHE_CAPACITY_ENV: &str = "VERIFY_CACHE_CAPACITY";

pub const GATEWAY_ROUTES_ENV: &str = "GATEWAY_ROUTES";
pub const GATEWAY_UPSTREAM_TIMEOUT_SECS_ENV: &str = "GATEWAY_UPSTREAM_TIMEOUT_SECS";
pub const GATEWAY_MAX_BODY_BYTES_ENV: &str = "GATEWAY_MAX_BODY_BYTES";

/// Environment variable selecting the log output format.
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

pub const DEFAULT_GATEWAY_PORT: u16 = 3000;
pub const DEFAULT_AUTH_PORT: u16 = 3001;
pub const DEFAULT_APP_PORT: u16 = 3002;
pub const DEFAULT_AUTH_SERVICE_URL: &str = "http://127.0.0.1:3001";
pub const DEFAULT_APP_SERVICE_URL: &str = "http://127.0.0.1:3002";
pub const DEFAULT_VERIFY_CACHE_CAPACITY: usize = 1024;

/// Longest accepted session token lifetime (one year).
pub const MAX_TOKEN_TTL_SECS: u64 = 365 * 24 * 60 * 60;

/// bcrypt accepts cost factors in this range.
const BCRYPT_COST_RANGE: std::ops::RangeInclusive<u32> = 4..=31;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} is required")]
    Missing(&'static str),
    #[error("{var}='{value}' is invalid: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
    #[error("JWT_SECRET: {0}")]
    SigningKey(#[from] KeyError),
    #[error("invalid route table: {0}")]
    Routes(#[from] RouteTableError),
}

/// Bind address of one service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListenConfig {
    pub host: IpAddr,
    pub port: u16,
}

impl ListenConfig {
    fn from_lookup<F>(lookup: &F, port_var: &'static str, default_port: u16) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            host: parse_or(lookup, HOST_ENV, IpAddr::V4(Ipv4Addr::UNSPECIFIED))?,
            port: parse_or(lookup, port_var, default_port)?,
        })
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

/// Auth Boundary Service configuration.
#[derive(Debug, Clone)]
pub struct AuthServiceConfig {
    pub listen: ListenConfig,
    pub signing_key: SigningKey,
    pub token_ttl: Duration,
    pub bcrypt_cost: u32,
}

impl AuthServiceConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(env_lookup)
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let secret = lookup(JWT_SECRET_ENV).ok_or(ConfigError::Missing(JWT_SECRET_ENV))?;
        let signing_key = SigningKey::from_secret(secret.as_bytes())?;

        let ttl_secs: u64 = parse_or(&lookup, TOKEN_TTL_SECS_ENV, 3600)?;
        if ttl_secs == 0 {
            return Err(invalid(TOKEN_TTL_SECS_ENV, "0", "must be greater than zero"));
        }
        if ttl_secs > MAX_TOKEN_TTL_SECS {
            return Err(invalid(
                TOKEN_TTL_SECS_ENV,
                ttl_secs,
                format!("must be at most {MAX_TOKEN_TTL_SECS}"),
            ));
        }

        let bcrypt_cost: u32 = parse_or(&lookup, BCRYPT_COST_ENV, crate::auth::password::DEFAULT_BCRYPT_COST)?;
        if !BCRYPT_COST_RANGE.contains(&bcrypt_cost) {
            return Err(invalid(
                BCRYPT_COST_ENV,
                bcrypt_cost,
                format!(
                    "must be between {} and {}",
                    BCRYPT_COST_RANGE.start(),
                    BCRYPT_COST_RANGE.end()
                ),
            ));
        }

        Ok(Self {
            listen: ListenConfig::from_lookup(&lookup, AUTH_PORT_ENV, DEFAULT_AUTH_PORT)?,
            signing_key,
            token_ttl: Duration::from_secs(ttl_secs),
            bcrypt_cost,
        })
    }
}

/// Protected Resource Service configuration.
#[derive(Debug, Clone)]
pub struct AppServiceConfig {
    pub listen: ListenConfig,
    pub auth_service_url: Url,
    pub verify_timeout: Duration,
    /// Zero disables the verification cache.
    pub cache_ttl: Duration,
    pub cache_capacity: usize,
}

impl AppServiceConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(env_lookup)
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let verify_timeout_ms: u64 = parse_or(&lookup, VERIFY_TIMEOUT_MS_ENV, 2000)?;
        if verify_timeout_ms == 0 {
            return Err(invalid(VERIFY_TIMEOUT_MS_ENV, "0", "must be greater than zero"));
        }

        Ok(Self {
            listen: ListenConfig::from_lookup(&lookup, APP_PORT_ENV, DEFAULT_APP_PORT)?,
            auth_service_url: service_url(&lookup, AUTH_SERVICE_URL_ENV, DEFAULT_AUTH_SERVICE_URL)?,
            verify_timeout: Duration::from_millis(verify_timeout_ms),
            cache_ttl: Duration::from_secs(parse_or(&lookup, VERIFY_CACHE_TTL_SECS_ENV, 0)?),
            cache_capacity: parse_or(&lookup, VERIFY_CACHE_CAPACITY_ENV, DEFAULT_VERIFY_CACHE_CAPACITY)?,
        })
    }

    pub fn cache_enabled(&self) -> bool {
        !self.cache_ttl.is_zero() && self.cache_capacity > 0
    }
}

/// Gateway Router configuration.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub listen: ListenConfig,
    pub routes: RouteTable,
    pub upstream_timeout: Duration,
    pub max_body_bytes: usize,
}

impl GatewayConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(env_lookup)
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let routes = match lookup(GATEWAY_ROUTES_ENV) {
            Some(raw) => RouteTable::parse(&raw)?,
            None => {
                let auth = service_url(&lookup, AUTH_SERVICE_URL_ENV, DEFAULT_AUTH_SERVICE_URL)?;
                let app = service_url(&lookup, APP_SERVICE_URL_ENV, DEFAULT_APP_SERVICE_URL)?;
                RouteTable::new(vec![
                    RouteMapping::new("/auth", auth.as_str(), None)?,
                    RouteMapping::new("/app", app.as_str(), None)?,
                ])?
            }
        };

        let timeout_secs: u64 = parse_or(&lookup, GATEWAY_UPSTREAM_TIMEOUT_SECS_ENV, 10)?;
        if timeout_secs == 0 {
            return Err(invalid(GATEWAY_UPSTREAM_TIMEOUT_SECS_ENV, "0", "must be greater than zero"));
        }

        Ok(Self {
            listen: ListenConfig::from_lookup(&lookup, GATEWAY_PORT_ENV, DEFAULT_GATEWAY_PORT)?,
            routes,
            upstream_timeout: Duration::from_secs(timeout_secs),
            max_body_bytes: parse_or(
                &lookup,
                GATEWAY_MAX_BODY_BYTES_ENV,
                crate::gateway::proxy::DEFAULT_MAX_BODY_BYTES,
            )?,
        })
    }
}

/// Process environment lookup. Empty values count as unset.
pub fn env_lookup(var: &str) -> Option<String> {
    std::env::var(var).ok().filter(|v| !v.trim().is_empty())
}

pub(crate) fn parse_or<T, F>(lookup: &F, var: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(var) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e: T::Err| invalid(var, &raw, e.to_string())),
        None => Ok(default),
    }
}

fn service_url<F>(lookup: &F, var: &'static str, default: &str) -> Result<Url, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(var).unwrap_or_else(|| default.to_string());
    let url = Url::parse(raw.trim()).map_err(|e| invalid(var, &raw, e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") || url.host().is_none() {
        return Err(invalid(var, &raw, "expected an absolute http(s) URL"));
    }
    Ok(url)
}

fn invalid(var: &'static str, value: impl Display, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        var,
        value: value.to_string(),
        reason: reason.into(),
    }
}
