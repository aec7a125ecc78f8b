//! Identity provider configuration.
//!
//! Configuration values come from the process environment (see the server's
//! config module) and are immutable for the process lifetime. All provider
//! fields must be non-empty; [`IdpConfig::validate`] enforces this so that a
//! misconfigured deployment fails at startup instead of silently serving
//! unauthenticated traffic.

use crate::error::ConfigError;

/// Configuration for the external identity provider and the application
/// URLs used to build callback and logout return addresses.
#[derive(Debug, Clone)]
pub struct IdpConfig {
    /// The provider tenant domain (e.g., "example.auth0.com").
    domain: String,
    /// The API audience requested during authorization.
    audience: String,
    /// The provider issuer URL (e.g., "https://example.auth0.com").
    issuer_url: String,
    /// The OAuth2 client ID registered with the provider.
    client_id: String,
    /// The OAuth2 client secret.
    client_secret: String,
    /// The browser-facing application base URL (logout return address).
    base_url: String,
    /// The backend base URL (callback address lives under it).
    api_url: String,
}

impl IdpConfig {
    /// Creates a new identity provider configuration.
    #[must_use]
    pub fn new(
        domain: String,
        audience: String,
        issuer_url: String,
        client_id: String,
        client_secret: String,
        base_url: String,
        api_url: String,
    ) -> Self {
        Self {
            domain,
            audience,
            issuer_url,
            client_id,
            client_secret,
            base_url,
            api_url,
        }
    }

    /// Checks that every provider field is non-empty.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingField`] naming the first environment
    /// variable that is unset.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("AUTH0_DOMAIN", &self.domain),
            ("AUTH0_AUDIENCE", &self.audience),
            ("AUTH0_ISSUER_URL", &self.issuer_url),
            ("AUTH0_CLIENT_ID", &self.client_id),
            ("AUTH0_CLIENT_SECRET", &self.client_secret),
        ] {
            if value.is_empty() {
                return Err(ConfigError::MissingField { name });
            }
        }
        Ok(())
    }

    /// Returns the provider tenant domain.
    #[must_use]
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Returns the API audience.
    #[must_use]
    pub fn audience(&self) -> &str {
        &self.audience
    }

    /// Returns the provider issuer URL.
    #[must_use]
    pub fn issuer_url(&self) -> &str {
        &self.issuer_url
    }

    /// Returns the OAuth2 client ID.
    #[must_use]
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// Returns the OAuth2 client secret.
    #[must_use]
    pub fn client_secret(&self) -> &str {
        &self.client_secret
    }

    /// Returns the browser-facing application base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the backend base URL.
    #[must_use]
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Returns the OAuth2 callback URL, built from the backend base URL.
    #[must_use]
    pub fn callback_url(&self) -> String {
        format!("{}/auth/callback", self.api_url)
    }
}
