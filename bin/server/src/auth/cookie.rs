//! The session cookie carrying the bearer token between requests.

use axum_extra::extract::CookieJar;
use axum_extra::extract::cookie::Cookie;
use time::Duration;
use wayfarer_auth::CredentialError;

/// Name of the cookie that stores the bearer token.
pub const AUTH_TOKEN_COOKIE: &str = "auth_token";

/// Lifetime of the session cookie, in seconds.
const AUTH_TOKEN_MAX_AGE_SECONDS: i64 = 3600;

/// Builds the session cookie holding a freshly obtained token.
///
/// Not marked `Secure` or `HttpOnly`: the SPA reads the token client-side
/// and local development runs over plain HTTP. Deployments terminating TLS
/// should revisit both flags.
#[must_use]
pub fn session_cookie(token: String) -> Cookie<'static> {
    Cookie::build((AUTH_TOKEN_COOKIE, token))
        .path("/")
        .max_age(Duration::seconds(AUTH_TOKEN_MAX_AGE_SECONDS))
        .build()
}

/// Builds the removal cookie that forces immediate client-side deletion.
#[must_use]
pub fn clear_session_cookie() -> Cookie<'static> {
    Cookie::build((AUTH_TOKEN_COOKIE, ""))
        .path("/")
        .http_only(true)
        .max_age(Duration::seconds(-1))
        .build()
}

/// Reads the bearer token from the request's cookie jar.
///
/// # Errors
///
/// Returns [`CredentialError::NoCookie`] when the cookie is absent and
/// [`CredentialError::EmptyCredential`] when it is present but blank.
pub fn token_from_jar(jar: &CookieJar) -> Result<String, CredentialError> {
    let cookie = jar.get(AUTH_TOKEN_COOKIE).ok_or(CredentialError::NoCookie)?;
    if cookie.value().is_empty() {
        return Err(CredentialError::EmptyCredential);
    }
    Ok(cookie.value().to_string())
}
