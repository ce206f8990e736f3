// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! LRU cache for remote verification results.
//!
//! Only successful verifications are cached. Entries are keyed by the SHA-256
//! of the token's signature segment and live for the shorter of the cache TTL
//! and the token's remaining lifetime, so a cached entry never outlives the
//! token it stands for.

use std::num::NonZeroUsize;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use chrono::Utc;
use lru::LruCache;
use sha2::{Digest, Sha256};

use super::AuthenticatedUser;

struct CacheEntry {
    user: AuthenticatedUser,
    expires_at: Instant,
}

/// In-process LRU cache in front of the remote verifier.
pub struct VerificationCache {
    cache: Mutex<LruCache<String, CacheEntry>>,
    ttl: Duration,
}

impl VerificationCache {
    /// Create a new cache with the given capacity and TTL.
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            cache: Mutex::new(LruCache::new(
                NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN),
            )),
            ttl,
        }
    }

    /// Get the cached user for a token, if present and not expired.
    pub fn get(&self, token: &str) -> Option<AuthenticatedUser> {
        let key = cache_key(token);
        let mut cache = self.cache.lock().ok()?;
        if let Some(entry) = cache.get(&key) {
            if Instant::now() < entry.expires_at {
                return Some(entry.user.clone());
            }
            cache.pop(&key);
        }
        None
    }

    /// Cache a successful verification. `token_exp` is the token's `exp` claim.
    pub fn put(&self, token: &str, user: AuthenticatedUser, token_exp: i64) {
        let remaining = token_exp - Utc::now().timestamp();
        let Ok(remaining) = u64::try_from(remaining) else {
            return;
        };
        let lifetime = self.ttl.min(Duration::from_secs(remaining));
        if lifetime.is_zero() {
            return;
        }

        if let Ok(mut cache) = self.cache.lock() {
            cache.put(
                cache_key(token),
                CacheEntry {
                    user,
                    expires_at: Instant::now() + lifetime,
                },
            );
        }
    }
}

/// SHA-256 (hex) of the signature segment; the whole token if it has no dots.
fn cache_key(token: &str) -> String {
    let signature = token.rsplit('.').next().unwrap_or(token);
    format!("{:x}", Sha256::digest(signature.as_bytes()))
}
