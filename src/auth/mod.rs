// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Token issuing and verification for the auth service, and the remote
//! verification boundary used by the resource service.
//!
//! ## Auth Flow
//!
//! 1. Client posts `{username, password}` to `/auth/login`
//! 2. [`SessionIssuer`] looks the user up through the `UserStore` trait,
//!    checks the bcrypt hash and mints an HS256 JWT (1 hour by default)
//! 3. Client sends `Authorization: Bearer <token>` to the resource service
//! 4. [`middleware::require_auth`] forwards the token to `/auth/verify`
//!    through [`VerifierClient`]; the auth service runs [`TokenVerifier`]
//! 5. Verified claims are attached to the request for the [`Auth`] extractor
//!
//! ## Security
//!
//! - Unknown user and wrong password are indistinguishable to the client
//! - Every token failure renders the same 401 body
//! - Verifier unavailability fails closed (401)
//! - Tokens are stateless; logout adds the token ID to a [`Denylist`]

pub mod cache;
pub mod claims;
pub mod denylist;
pub mod error;
pub mod extractor;
pub mod issuer;
pub mod keys;
pub mod middleware;
pub mod password;
pub mod remote;
pub mod roles;
pub mod verifier;

pub use cache::VerificationCache;
pub use claims::{AuthenticatedUser, TokenClaims};
pub use denylist::Denylist;
pub use error::AuthError;
pub use extractor::Auth;
pub use issuer::{IssuedToken, SessionIssuer};
pub use keys::SigningKey;
pub use password::PasswordHasher;
pub use remote::VerifierClient;
pub use roles::Role;
pub use verifier::TokenVerifier;
