//! End-to-end tests for the authentication gateway against a mock IdP.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{HeaderValue, Request, StatusCode, header};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde_json::{Value, json};
use tower::ServiceExt;
use wiremock::matchers::{header as header_matcher, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use wayfarer_auth::{IdpClient, IdpConfig};
use wayfarer_server::auth::AppState;
use wayfarer_server::router;

fn test_app(issuer_url: &str) -> Router {
    let config = IdpConfig::new(
        "example.auth0.com".to_string(),
        "https://api.wayfarer.example".to_string(),
        issuer_url.to_string(),
        "test-client".to_string(),
        "test-secret".to_string(),
        "http://localhost:3000".to_string(),
        "http://localhost:8080".to_string(),
    );
    let idp = IdpClient::new(config).expect("client");
    router::build(
        Arc::new(AppState::new(idp)),
        HeaderValue::from_static("http://localhost:3000"),
    )
}

/// Builds an unsigned bearer token with the given time claims.
fn bearer_token(exp: i64, iat: i64) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none"}"#);
    let payload = URL_SAFE_NO_PAD.encode(format!(r#"{{"exp":{exp},"iat":{iat}}}"#).as_bytes());
    format!("{header}.{payload}.signature")
}

fn fresh_token() -> String {
    let now = chrono::Utc::now().timestamp();
    bearer_token(now + 3600, now - 60)
}

fn location(response: &axum::response::Response) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .expect("location header")
        .to_str()
        .expect("ascii location")
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    serde_json::from_slice(&bytes).expect("json body")
}

#[tokio::test]
async fn health_is_reachable_without_credentials() {
    let app = test_app("https://example.auth0.com");

    let response = app
        .oneshot(Request::get("/health").body(Body::empty()).expect("request"))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "wayfarer-server");
}

#[tokio::test]
async fn request_without_credential_redirects_to_login() {
    let app = test_app("https://example.auth0.com");

    let response = app
        .oneshot(Request::get("/api/me").body(Body::empty()).expect("request"))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    let location = location(&response);
    assert!(location.starts_with("https://example.auth0.com/authorize?"));
    assert!(location.contains("response_type=code"));
    assert!(location.contains("state=%2Fapi%2Fme"));
}

#[tokio::test]
async fn state_preserves_the_original_query_string() {
    let app = test_app("https://example.auth0.com");

    let response = app
        .oneshot(
            Request::get("/api/profile?tab=trips")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert!(location(&response).contains("state=%2Fapi%2Fprofile%3Ftab%3Dtrips"));
}

#[tokio::test]
async fn expired_cookie_token_redirects_without_calling_the_idp() {
    let server = MockServer::start().await;

    // Verified on drop: token validation must fail before any userinfo call.
    Mock::given(method("GET"))
        .and(path("/userinfo"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let app = test_app(&server.uri());

    let now = chrono::Utc::now().timestamp();
    let expired = bearer_token(now - 10, now - 3600);

    let response = app
        .oneshot(
            Request::get("/api/me")
                .header(header::COOKIE, format!("auth_token={expired}"))
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert!(location(&response).contains("response_type=code"));
}

#[tokio::test]
async fn cookie_token_overrides_authorization_header() {
    let server = MockServer::start().await;
    let cookie_token = fresh_token();

    // Only the cookie's token resolves to a profile. If the gate preferred
    // the header token the userinfo call would miss this mock and fail.
    Mock::given(method("GET"))
        .and(path("/userinfo"))
        .and(header_matcher(
            "authorization",
            format!("Bearer {cookie_token}").as_str(),
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "sub": "auth0|cookie-user",
            "email": "cookie@example.com",
            "nickname": "cookie"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let app = test_app(&server.uri());
    let header_token = fresh_token();

    let response = app
        .oneshot(
            Request::get("/api/me")
                .header(header::AUTHORIZATION, format!("Bearer {header_token}"))
                .header(header::COOKIE, format!("auth_token={cookie_token}"))
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["user"]["id"], "auth0|cookie-user");
    assert_eq!(body["message"], "You are authenticated!");
}

#[tokio::test]
async fn bearer_header_alone_authenticates() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/userinfo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "sub": "auth0|header-user",
            "email": "header@example.com",
            "nickname": "header"
        })))
        .mount(&server)
        .await;

    let app = test_app(&server.uri());

    let response = app
        .oneshot(
            Request::get("/api/profile")
                .header(header::AUTHORIZATION, format!("Bearer {}", fresh_token()))
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["id"], "auth0|header-user");
    assert_eq!(body["email"], "header@example.com");
}

#[tokio::test]
async fn login_redirects_to_the_authorize_url() {
    let app = test_app("https://example.auth0.com");

    let response = app
        .oneshot(
            Request::get("/auth/login?return_url=%2Ftrips")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    let location = location(&response);
    assert!(location.starts_with("https://example.auth0.com/authorize?"));
    assert!(location.contains("state=%2Ftrips"));
}

#[tokio::test]
async fn login_defaults_the_return_url_to_root() {
    let app = test_app("https://example.auth0.com");

    let response = app
        .oneshot(
            Request::get("/auth/login")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert!(location(&response).ends_with("state=%2F"));
}

#[tokio::test]
async fn callback_with_provider_error_returns_client_error() {
    let app = test_app("https://example.auth0.com");

    let response = app
        .oneshot(
            Request::get("/auth/callback?error=access_denied&error_description=User%20cancelled")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "access_denied");
    assert_eq!(body["error_description"], "User cancelled");
}

#[tokio::test]
async fn callback_without_code_returns_client_error() {
    let app = test_app("https://example.auth0.com");

    let response = app
        .oneshot(
            Request::get("/auth/callback?state=%2F")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Authorization code not provided");
}

#[tokio::test]
async fn callback_exchanges_the_code_and_sets_the_session_cookie() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access_token": "abc"})))
        .expect(1)
        .mount(&server)
        .await;

    let app = test_app(&server.uri());

    let response = app
        .oneshot(
            Request::get("/auth/callback?code=xyz&state=%2Fdashboard")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&response), "/dashboard");

    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("set-cookie")
        .to_str()
        .expect("ascii cookie");
    assert!(set_cookie.contains("auth_token=abc"));
    assert!(set_cookie.contains("Max-Age=3600"));
    assert!(set_cookie.contains("Path=/"));
}

#[tokio::test]
async fn callback_with_rejected_code_returns_server_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(403).set_body_string("invalid_grant"))
        .mount(&server)
        .await;

    let app = test_app(&server.uri());

    let response = app
        .oneshot(
            Request::get("/auth/callback?code=stale")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Failed to exchange code for token");
    assert!(body["details"].as_str().expect("details").contains("403"));
}

#[tokio::test]
async fn callback_without_access_token_in_response_returns_server_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token_type": "Bearer"})))
        .mount(&server)
        .await;

    let app = test_app(&server.uri());

    let response = app
        .oneshot(
            Request::get("/auth/callback?code=xyz")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Access token not found in response");
}

#[tokio::test]
async fn logout_clears_the_cookie_and_redirects_to_the_provider() {
    let app = test_app("https://example.auth0.com");

    let response = app
        .oneshot(
            Request::get("/auth/logout")
                .header(header::COOKIE, format!("auth_token={}", fresh_token()))
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    let location = location(&response);
    assert!(location.starts_with("https://example.auth0.com/v2/logout?"));
    assert!(location.contains("client_id=test-client"));
    assert!(location.contains("returnTo=http%3A%2F%2Flocalhost%3A3000"));

    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("set-cookie")
        .to_str()
        .expect("ascii cookie");
    assert!(set_cookie.starts_with("auth_token=;"));
    assert!(set_cookie.contains("HttpOnly"));
    assert!(set_cookie.contains("Max-Age=-1"));
}

#[tokio::test]
async fn responses_echo_a_provided_request_id() {
    let app = test_app("https://example.auth0.com");

    let response = app
        .oneshot(
            Request::get("/health")
                .header("x-request-id", "abc-123")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(
        response
            .headers()
            .get("x-request-id")
            .expect("request id header"),
        "abc-123"
    );
}

#[tokio::test]
async fn responses_without_a_request_id_get_a_generated_one() {
    let app = test_app("https://example.auth0.com");

    let response = app
        .oneshot(Request::get("/health").body(Body::empty()).expect("request"))
        .await
        .expect("response");

    let request_id = response
        .headers()
        .get("x-request-id")
        .expect("request id header")
        .to_str()
        .expect("ascii id");
    assert!(!request_id.is_empty());
}
