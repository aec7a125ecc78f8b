//! Application handlers behind (and beside) the authentication gate.

use axum::response::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Value, json};
use wayfarer_auth::Identity;

use crate::auth::RequireAuth;

/// Health check response body.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
    pub service: &'static str,
}

/// Unauthenticated health check.
pub async fn health() -> Json<HealthResponse> {
    tracing::debug!("health check");
    Json(HealthResponse {
        status: "healthy",
        timestamp: Utc::now(),
        service: "wayfarer-server",
    })
}

/// Returns the caller's resolved identity with a greeting.
pub async fn me(RequireAuth(identity): RequireAuth) -> Json<Value> {
    Json(json!({
        "message": "You are authenticated!",
        "user": identity,
    }))
}

/// Returns the caller's profile.
pub async fn profile(RequireAuth(identity): RequireAuth) -> Json<Identity> {
    Json(identity)
}
