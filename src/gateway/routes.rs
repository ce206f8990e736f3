// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Static route table: path prefix → upstream, with prefix rewrite.
//!
//! Loaded once at startup and immutable afterwards. Prefixes are
//! segment-aware (`/auth` matches `/auth` and `/auth/login`, not `/authx`)
//! and pairwise disjoint, so at most one mapping matches any path.
//!
//! Paths with `.` or `..` segments (plain or percent-encoded) never resolve:
//! URL normalization would otherwise move them out of the rewrite prefix.

use url::Url;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouteTableError {
    #[error("route prefix '{0}' must start with '/', must not end with '/' and must not be '/'")]
    InvalidPrefix(String),
    #[error("rewrite prefix '{0}' must be empty or start with '/' and not end with '/'")]
    InvalidRewrite(String),
    #[error("upstream '{upstream}' is not an absolute http(s) URL: {reason}")]
    InvalidUpstream { upstream: String, reason: String },
    #[error("route prefixes '{0}' and '{1}' overlap")]
    Overlap(String, String),
    #[error("route entry '{0}' is not of the form prefix=upstream[;rewrite]")]
    InvalidEntry(String),
    #[error("route table is empty")]
    Empty,
}

/// One `{prefix → upstream, rewrite}` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMapping {
    prefix: String,
    upstream: Url,
    rewrite: String,
}

impl RouteMapping {
    /// Build a mapping. `rewrite` defaults to the prefix itself (pass-through).
    pub fn new(prefix: &str, upstream: &str, rewrite: Option<&str>) -> Result<Self, RouteTableError> {
        if !prefix.starts_with('/') || prefix.ends_with('/') {
            return Err(RouteTableError::InvalidPrefix(prefix.to_string()));
        }

        let rewrite = rewrite.unwrap_or(prefix);
        if !(rewrite.is_empty() || rewrite.starts_with('/')) || rewrite.ends_with('/') {
            return Err(RouteTableError::InvalidRewrite(rewrite.to_string()));
        }

        let invalid = |reason: String| RouteTableError::InvalidUpstream {
            upstream: upstream.to_string(),
            reason,
        };
        let upstream_url = Url::parse(upstream).map_err(|e| invalid(e.to_string()))?;
        if !matches!(upstream_url.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme '{}'", upstream_url.scheme())));
        }
        if upstream_url.host().is_none() {
            return Err(invalid("missing host".to_string()));
        }

        Ok(Self {
            prefix: prefix.to_string(),
            upstream: upstream_url,
            rewrite: rewrite.to_string(),
        })
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn upstream(&self) -> &Url {
        &self.upstream
    }

    pub fn rewrite(&self) -> &str {
        &self.rewrite
    }

    /// Whether `path` falls under this prefix at a segment boundary.
    pub fn matches(&self, path: &str) -> bool {
        segment_prefix(&self.prefix, path)
    }

    /// Upstream URL for `path` (which must match) and an optional query string.
    pub fn target_url(&self, path: &str, query: Option<&str>) -> Url {
        let rest = path.strip_prefix(self.prefix.as_str()).unwrap_or("");
        let mut rewritten = format!(
            "{}{}{}",
            self.upstream.path().trim_end_matches('/'),
            self.rewrite,
            rest
        );
        if rewritten.is_empty() {
            rewritten.push('/');
        }

        let mut url = self.upstream.clone();
        url.set_path(&rewritten);
        url.set_query(query);
        url
    }
}

/// Whether any segment of `path` is `.` or `..`, including `%2e` spellings.
fn has_dot_segment(path: &str) -> bool {
    path.split('/').any(|segment| {
        let decoded = segment.to_ascii_lowercase().replace("%2e", ".");
        decoded == "." || decoded == ".."
    })
}

/// `prefix` covers `path` exactly or up to a `/`.
fn segment_prefix(prefix: &str, path: &str) -> bool {
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

/// The gateway's immutable routing table.
#[derive(Debug, Clone)]
pub struct RouteTable {
    mappings: Vec<RouteMapping>,
}

impl RouteTable {
    /// Validate and build a table. Rejects empty tables and overlapping prefixes.
    pub fn new(mut mappings: Vec<RouteMapping>) -> Result<Self, RouteTableError> {
        if mappings.is_empty() {
            return Err(RouteTableError::Empty);
        }

        for (i, a) in mappings.iter().enumerate() {
            for b in &mappings[i + 1..] {
                if segment_prefix(&a.prefix, &b.prefix) || segment_prefix(&b.prefix, &a.prefix) {
                    return Err(RouteTableError::Overlap(a.prefix.clone(), b.prefix.clone()));
                }
            }
        }

        // Longest first, so resolution is a longest-prefix match.
        mappings.sort_by(|a, b| b.prefix.len().cmp(&a.prefix.len()));
        Ok(Self { mappings })
    }

    /// Parse `prefix=upstream[;rewrite]` entries separated by commas.
    ///
    /// ```text
    /// /auth=http://127.0.0.1:3001,/app=http://127.0.0.1:3002;/app
    /// ```
    pub fn parse(raw: &str) -> Result<Self, RouteTableError> {
        let mut mappings = Vec::new();
        for entry in raw.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let (prefix, target) = entry
                .split_once('=')
                .ok_or_else(|| RouteTableError::InvalidEntry(entry.to_string()))?;
            let (upstream, rewrite) = match target.split_once(';') {
                Some((upstream, rewrite)) => (upstream.trim(), Some(rewrite.trim())),
                None => (target.trim(), None),
            };
            mappings.push(RouteMapping::new(prefix.trim(), upstream, rewrite)?);
        }
        Self::new(mappings)
    }

    /// Longest-prefix match for a request path.
    pub fn resolve(&self, path: &str) -> Option<&RouteMapping> {
        if has_dot_segment(path) {
            return None;
        }
        self.mappings.iter().find(|m| m.matches(path))
    }

    pub fn mappings(&self) -> &[RouteMapping] {
        &self.mappings
    }
}
