// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token revocation denylist.
//!
//! Keyed by token ID (`jti`). An entry only needs to live as long as the token
//! it revokes: once the token's own expiry has passed, verification rejects it
//! anyway, so the entry is purged.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::Utc;

/// In-process denylist shared between the verifier and the logout handler.
#[derive(Clone, Default)]
pub struct Denylist {
    entries: Arc<Mutex<HashMap<String, i64>>>,
}

impl Denylist {
    pub fn new() -> Self {
        Self::default()
    }

    /// Revoke a token ID until `expires_at` (Unix seconds).
    pub fn revoke(&self, jti: &str, expires_at: i64) {
        let now = Utc::now().timestamp();
        if let Ok(mut entries) = self.entries.lock() {
            entries.retain(|_, exp| *exp > now);
            if expires_at > now {
                entries.insert(jti.to_string(), expires_at);
            }
        }
    }

    /// Whether the token ID is currently revoked.
    pub fn is_revoked(&self, jti: &str) -> bool {
        let now = Utc::now().timestamp();
        let Ok(mut entries) = self.entries.lock() else {
            // A poisoned lock means we can no longer tell; refuse the token.
            return true;
        };
        match entries.get(jti) {
            Some(exp) if *exp > now => true,
            Some(_) => {
                entries.remove(jti);
                false
            }
            None => false,
        }
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
