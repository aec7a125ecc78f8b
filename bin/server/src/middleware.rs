//! Request-scoped context and completion logging.
//!
//! Each request gets a request ID (honoring an inbound `X-Request-ID`
//! header, generating a ulid otherwise) which is echoed on the response
//! and attached to a tracing span wrapping the handler, so every log line
//! emitted while processing the request carries it.

use std::time::Instant;

use axum::{
    extract::Request,
    http::HeaderValue,
    middleware::Next,
    response::Response,
};
use tracing::Instrument;
use ulid::Ulid;

/// Header carrying the request ID in and out.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Middleware wrapping each request in an identified, logged span.
pub async fn request_context(request: Request, next: Next) -> Response {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
        .map_or_else(|| Ulid::new().to_string(), str::to_string);

    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let query = request.uri().query().unwrap_or_default().to_string();

    let span = tracing::info_span!(
        "request",
        %method,
        path = %path,
        request_id = %request_id,
    );

    let start = Instant::now();
    let mut response = next.run(request).instrument(span).await;
    let latency = start.elapsed();
    let status = response.status();

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    if status.is_client_error() || status.is_server_error() {
        tracing::error!(
            %method,
            path = %path,
            query = %query,
            request_id = %request_id,
            status = status.as_u16(),
            latency_ms = latency.as_millis() as u64,
            "request failed"
        );
    } else {
        tracing::info!(
            %method,
            path = %path,
            query = %query,
            request_id = %request_id,
            status = status.as_u16(),
            latency_ms = latency.as_millis() as u64,
            "request completed"
        );
    }

    response
}
