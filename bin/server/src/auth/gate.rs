//! The per-request authentication gate.
//!
//! Implemented as an Axum extractor so protected handlers simply take
//! [`RequireAuth`] as an argument. Every denial is a temporary redirect to
//! a freshly built authorize URL carrying the original request URL as
//! `state`; the gate is built for a browser-driven SPA, so machine callers
//! must treat 307 responses as authentication failures.

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::CookieJar;
use std::sync::Arc;
use wayfarer_auth::{Identity, token};

use super::{AppState, cookie};

/// Extractor requiring an authenticated caller.
///
/// On success the request's resolved [`Identity`] is available to the
/// handler. The identity is fetched from the provider per request and
/// dropped when the request completes.
pub struct RequireAuth(pub Identity);

impl<S> FromRequestParts<S> for RequireAuth
where
    Arc<AppState>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = Arc::<AppState>::from_ref(state);
        let jar = CookieJar::from_request_parts(parts, state)
            .await
            .map_err(|_| AuthRejection::Internal)?;

        // The URL the caller was trying to reach, round-tripped through the
        // provider as `state` so the callback can send them back.
        let original_url = parts
            .uri
            .path_and_query()
            .map_or("/", |pq| pq.as_str())
            .to_string();
        let login_url = app_state.idp.authorize_url(&original_url);

        // Candidate credential: Authorization header first, but a session
        // cookie overrides it when both are present.
        let mut candidate = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::to_string);
        if let Ok(cookie_token) = cookie::token_from_jar(&jar) {
            candidate = Some(cookie_token);
        }

        let Some(candidate) = candidate else {
            tracing::debug!(path = %parts.uri.path(), "no credential in header or cookie");
            return Err(AuthRejection::Login(login_url));
        };

        if let Err(error) = token::validate(&candidate) {
            tracing::warn!(%error, path = %parts.uri.path(), "rejected invalid token");
            return Err(AuthRejection::Login(login_url));
        }

        match app_state.idp.fetch_profile(&candidate).await {
            Ok(identity) => {
                tracing::debug!(user_id = %identity.id, "authenticated");
                Ok(RequireAuth(identity))
            }
            Err(error) => {
                tracing::warn!(%error, path = %parts.uri.path(), "profile lookup failed");
                Err(AuthRejection::Login(login_url))
            }
        }
    }
}

/// Rejection type for the authentication gate.
#[derive(Debug)]
pub enum AuthRejection {
    /// Redirect the caller to the identity provider's authorize endpoint.
    Login(String),
    /// Request state was unusable; should not happen in practice.
    Internal,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::Login(url) => Redirect::temporary(&url).into_response(),
            Self::Internal => (
                axum::http::StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error",
            )
                .into_response(),
        }
    }
}
