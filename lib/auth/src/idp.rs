//! Identity provider client for the OAuth2 Authorization Code flow.
//!
//! The client performs the two outbound calls the flow needs: exchanging an
//! authorization code for tokens, and resolving an access token to a user
//! profile. It also builds the authorize and logout URLs the flow endpoints
//! redirect to. Calls are made with a bounded timeout and no retries; the
//! caller decides retry policy.

use std::time::Duration;

use serde_json::{Map, Value};

use crate::config::IdpConfig;
use crate::error::IdpError;
use crate::identity::{Identity, UserInfo};

/// Provider path for the authorization endpoint.
const AUTHORIZE_PATH: &str = "authorize";
/// Provider path for the token endpoint.
const TOKEN_PATH: &str = "oauth/token";
/// Provider path for the userinfo endpoint.
const USERINFO_PATH: &str = "userinfo";
/// Provider path for the logout endpoint.
const LOGOUT_PATH: &str = "v2/logout";

/// Bound on each outbound call so a slow provider cannot hang requests.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Client for the external identity provider.
pub struct IdpClient {
    http: reqwest::Client,
    config: IdpConfig,
}

impl IdpClient {
    /// Creates a client for the configured provider.
    ///
    /// # Errors
    ///
    /// Returns [`IdpError::Client`] if the underlying HTTP client cannot
    /// be constructed.
    pub fn new(config: IdpConfig) -> Result<Self, IdpError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| IdpError::Client {
                detail: e.to_string(),
            })?;

        Ok(Self { http, config })
    }

    /// Returns the provider configuration.
    #[must_use]
    pub fn config(&self) -> &IdpConfig {
        &self.config
    }

    /// Builds the authorization URL that starts the code flow.
    ///
    /// `return_url` is round-tripped through the provider as the `state`
    /// parameter so the callback can send the browser back where it came
    /// from. It is percent-encoded here and decoded verbatim on callback.
    #[must_use]
    pub fn authorize_url(&self, return_url: &str) -> String {
        let authorize = join_url(self.config.issuer_url(), AUTHORIZE_PATH);
        format!(
            "{authorize}?response_type=code&client_id={}&redirect_uri={}&scope=openid%20profile%20email&audience={}&state={}",
            self.config.client_id(),
            urlencoding::encode(&self.config.callback_url()),
            urlencoding::encode(self.config.audience()),
            urlencoding::encode(return_url),
        )
    }

    /// Builds the provider logout URL, returning the browser to the
    /// application base URL afterwards.
    #[must_use]
    pub fn logout_url(&self) -> String {
        let logout = join_url(self.config.issuer_url(), LOGOUT_PATH);
        format!(
            "{logout}?client_id={}&returnTo={}",
            self.config.client_id(),
            urlencoding::encode(self.config.base_url()),
        )
    }

    /// Exchanges an authorization code for the provider's token response.
    ///
    /// The response is returned as the provider's raw JSON object; the
    /// caller extracts `access_token` from it.
    ///
    /// # Errors
    ///
    /// Returns [`IdpError::ExchangeFailed`] on transport errors, non-2xx
    /// responses (error body captured for diagnostics), or an unparseable
    /// response body.
    pub async fn exchange_code(&self, code: &str) -> Result<Map<String, Value>, IdpError> {
        let token_url = join_url(self.config.issuer_url(), TOKEN_PATH);
        let callback_url = self.config.callback_url();
        let params = [
            ("grant_type", "authorization_code"),
            ("client_id", self.config.client_id()),
            ("client_secret", self.config.client_secret()),
            ("code", code),
            ("redirect_uri", callback_url.as_str()),
        ];

        let response = self
            .http
            .post(&token_url)
            .form(&params)
            .send()
            .await
            .map_err(|e| IdpError::ExchangeFailed {
                status: None,
                detail: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(IdpError::ExchangeFailed {
                status: Some(status.as_u16()),
                detail: body,
            });
        }

        let tokens = response
            .json()
            .await
            .map_err(|e| IdpError::ExchangeFailed {
                status: Some(status.as_u16()),
                detail: format!("failed to decode token response: {e}"),
            })?;

        tracing::debug!("authorization code exchanged");
        Ok(tokens)
    }

    /// Resolves an access token to the canonical [`Identity`] via the
    /// provider's userinfo endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`IdpError::ProfileFetchFailed`] on transport errors or
    /// non-2xx responses and [`IdpError::ProfileDecodeFailed`] when the
    /// body is not a valid profile.
    pub async fn fetch_profile(&self, access_token: &str) -> Result<Identity, IdpError> {
        let userinfo_url = join_url(self.config.issuer_url(), USERINFO_PATH);

        let response = self
            .http
            .get(&userinfo_url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| IdpError::ProfileFetchFailed {
                status: None,
                detail: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(IdpError::ProfileFetchFailed {
                status: Some(status.as_u16()),
                detail: body,
            });
        }

        let info: UserInfo = response
            .json()
            .await
            .map_err(|e| IdpError::ProfileDecodeFailed {
                detail: e.to_string(),
            })?;

        let identity = Identity::from(info);
        tracing::debug!(user_id = %identity.id, "fetched user profile");
        Ok(identity)
    }
}

/// Joins a base URL and a path with exactly one separating slash.
///
/// Every provider URL builder relies on this so that configured issuer
/// URLs work with or without a trailing slash.
#[must_use]
pub fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> IdpConfig {
        IdpConfig::new(
            "example.auth0.com".to_string(),
            "https://api.wayfarer.example".to_string(),
            "https://example.auth0.com".to_string(),
            "test-client".to_string(),
            "test-secret".to_string(),
            "http://localhost:3000".to_string(),
            "http://localhost:8080".to_string(),
        )
    }

    #[test]
    fn join_url_with_trailing_slash_on_base() {
        assert_eq!(
            join_url("https://idp.example/", "authorize"),
            "https://idp.example/authorize"
        );
    }

    #[test]
    fn join_url_with_leading_slash_on_path() {
        assert_eq!(
            join_url("https://idp.example", "/authorize"),
            "https://idp.example/authorize"
        );
    }

    #[test]
    fn join_url_with_both_slashes() {
        assert_eq!(
            join_url("https://idp.example/", "/oauth/token"),
            "https://idp.example/oauth/token"
        );
    }

    #[test]
    fn authorize_url_carries_the_code_flow_parameters() {
        let idp = IdpClient::new(test_config()).expect("client");
        let url = idp.authorize_url("/trips/42?tab=notes");

        assert!(url.starts_with("https://example.auth0.com/authorize?"));
        assert!(url.contains("response_type=code"));
        assert!(url.contains("client_id=test-client"));
        assert!(url.contains("scope=openid%20profile%20email"));
        assert!(url.contains("redirect_uri=http%3A%2F%2Flocalhost%3A8080%2Fauth%2Fcallback"));
        assert!(url.contains("audience=https%3A%2F%2Fapi.wayfarer.example"));
        assert!(url.contains("state=%2Ftrips%2F42%3Ftab%3Dnotes"));
    }

    #[test]
    fn logout_url_returns_to_the_application_base() {
        let idp = IdpClient::new(test_config()).expect("client");
        let url = idp.logout_url();

        assert!(url.starts_with("https://example.auth0.com/v2/logout?"));
        assert!(url.contains("client_id=test-client"));
        assert!(url.contains("returnTo=http%3A%2F%2Flocalhost%3A3000"));
    }
}
