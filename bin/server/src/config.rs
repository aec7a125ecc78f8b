//! Centralized server configuration.
//!
//! Strongly-typed configuration loaded via the `config` crate from
//! environment variables. The five `AUTH0_*` variables have no defaults;
//! [`ServerConfig::idp_config`] refuses to produce a provider configuration
//! unless all of them are set, so a misconfigured deployment fails at
//! startup instead of serving unauthenticated traffic.

use serde::Deserialize;
use wayfarer_auth::{ConfigError, IdpConfig};

/// Server configuration, read once at startup.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Port the HTTP listener binds to.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Log level used when `RUST_LOG` is not set.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Browser-facing application base URL (CORS origin, logout return).
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Backend base URL; the OAuth2 callback address lives under it.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Identity provider tenant domain.
    #[serde(default)]
    pub auth0_domain: String,

    /// API audience requested during authorization.
    #[serde(default)]
    pub auth0_audience: String,

    /// Identity provider issuer URL.
    #[serde(default)]
    pub auth0_issuer_url: String,

    /// OAuth2 client ID.
    #[serde(default)]
    pub auth0_client_id: String,

    /// OAuth2 client secret.
    #[serde(default)]
    pub auth0_client_secret: String,
}

fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_base_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_api_url() -> String {
    "http://localhost:8080".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            log_level: default_log_level(),
            base_url: default_base_url(),
            api_url: default_api_url(),
            auth0_domain: String::new(),
            auth0_audience: String::new(),
            auth0_issuer_url: String::new(),
            auth0_client_id: String::new(),
            auth0_client_secret: String::new(),
        }
    }
}

impl ServerConfig {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a present variable cannot be parsed into its
    /// typed field (e.g., a non-numeric `PORT`).
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::Environment::default().try_parsing(true))
            .build()?
            .try_deserialize()
    }

    /// Produces the validated identity provider configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingField`] naming the first unset
    /// `AUTH0_*` variable.
    pub fn idp_config(&self) -> Result<IdpConfig, ConfigError> {
        let config = IdpConfig::new(
            self.auth0_domain.clone(),
            self.auth0_audience.clone(),
            self.auth0_issuer_url.clone(),
            self.auth0_client_id.clone(),
            self.auth0_client_secret.clone(),
            self.base_url.clone(),
            self.api_url.clone(),
        );
        config.validate()?;
        Ok(config)
    }

    /// Logs the loaded configuration. The client secret itself is never
    /// logged, only whether it is set.
    pub fn log_summary(&self) {
        tracing::info!(
            port = self.port,
            log_level = %self.log_level,
            base_url = %self.base_url,
            api_url = %self.api_url,
            auth0_domain = %self.auth0_domain,
            auth0_audience = %self.auth0_audience,
            auth0_issuer_url = %self.auth0_issuer_url,
            auth0_client_id = %self.auth0_client_id,
            auth0_client_secret_set = !self.auth0_client_secret.is_empty(),
            "loaded configuration"
        );
    }
}
