//! Authentication gateway for the wayfarer server.
//!
//! This module provides:
//! - The OAuth2 Authorization Code flow endpoints (`/auth/login`,
//!   `/auth/callback`, `/auth/logout`)
//! - The session cookie that carries the bearer token between requests
//! - The [`RequireAuth`] extractor gating protected routes
//!
//! # Flow
//!
//! An unauthenticated request to a protected route is redirected to the
//! identity provider's authorize endpoint with the original request URL
//! round-tripped as the `state` parameter. The provider redirects back to
//! `/auth/callback`, which exchanges the code for an access token, writes
//! it into the session cookie, and redirects to the decoded `state`.
//! Subsequent requests present the cookie (or an `Authorization: Bearer`
//! header); the gate time-validates the token and resolves it to an
//! [`Identity`](wayfarer_auth::Identity) via the provider's userinfo
//! endpoint on every request. No session state is held server-side.

pub mod cookie;
pub mod gate;
pub mod routes;

use wayfarer_auth::IdpClient;

pub use gate::{AuthRejection, RequireAuth};
pub use routes::{callback, login, logout};

/// Shared application state.
pub struct AppState {
    /// Client for the external identity provider.
    pub idp: IdpClient,
}

impl AppState {
    /// Creates a new application state.
    #[must_use]
    pub fn new(idp: IdpClient) -> Self {
        Self { idp }
    }
}
