// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Storage
//!
//! The auth logic only depends on the [`UserStore`] trait, so a persistent
//! backend can replace [`InMemoryUserStore`] without touching the issuer.
//! A persistent backend must enforce username/email uniqueness atomically
//! (a unique constraint), not with a check-then-insert.
//!
//! [`ResourceDirectory`] is the resource service's mock content.

pub mod directory;
pub mod users;

pub use directory::ResourceDirectory;
pub use users::{InMemoryUserStore, UserStore};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Unique username/email constraint violated.
    #[error("{field} '{value}' is already taken")]
    Conflict { field: &'static str, value: String },
}

pub type StoreResult<T> = Result<T, StoreError>;
