//! Router assembly: auth endpoints, gated API, SPA serving, CORS.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    routing::get,
};
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};

use crate::auth::{self, AppState};
use crate::handlers;
use crate::middleware;

/// Directory the built frontend is served from.
const DIST_DIR: &str = "dist";

/// Builds the application router.
///
/// `allowed_origin` is the browser-facing base URL; credentials are
/// allowed so the session cookie rides along on API calls from the SPA.
pub fn build(state: Arc<AppState>, allowed_origin: HeaderValue) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(allowed_origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::ORIGIN, header::CONTENT_TYPE, header::AUTHORIZATION])
        .expose_headers([header::CONTENT_LENGTH])
        .allow_credentials(true)
        .max_age(Duration::from_secs(12 * 60 * 60));

    // Unknown paths fall through to index.html for SPA client-side routing.
    let spa = ServeDir::new(DIST_DIR).fallback(ServeFile::new(format!("{DIST_DIR}/index.html")));

    Router::new()
        .route("/health", get(handlers::health))
        .route("/auth/login", get(auth::login))
        .route("/auth/callback", get(auth::callback))
        .route("/auth/logout", get(auth::logout))
        .route("/api/me", get(handlers::me))
        .route("/api/profile", get(handlers::profile))
        .fallback_service(spa)
        .layer(axum::middleware::from_fn(middleware::request_context))
        .layer(cors)
        .with_state(state)
}
