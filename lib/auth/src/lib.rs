//! OAuth2 authentication core for the wayfarer backend.
//!
//! This crate provides:
//! - Bearer token time-validation (`token`)
//! - The identity provider client for the Authorization Code flow (`IdpClient`)
//! - The canonical authenticated identity (`Identity`)
//! - Identity provider configuration (`IdpConfig`)
//! - Authentication error types
//!
//! # Trust Model
//!
//! Tokens are *not* signature-verified here. A token is trusted because it was
//! obtained directly from the identity provider's token endpoint during the
//! Authorization Code flow, and every gated request additionally round-trips
//! to the provider's userinfo endpoint, which rejects tokens the provider did
//! not issue. The [`token`] module only checks the embedded expiration and
//! issued-at claims so obviously stale credentials are turned away without a
//! network call.
//!
//! # Example
//!
//! ```no_run
//! use wayfarer_auth::{IdpClient, IdpConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = IdpConfig::new(
//!     "example.auth0.com".to_string(),
//!     "https://api.wayfarer.example".to_string(),
//!     "https://example.auth0.com".to_string(),
//!     "client-id".to_string(),
//!     "client-secret".to_string(),
//!     "http://localhost:3000".to_string(),
//!     "http://localhost:8080".to_string(),
//! );
//! config.validate()?;
//!
//! let idp = IdpClient::new(config)?;
//! let tokens = idp.exchange_code("authorization-code").await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod identity;
pub mod idp;
pub mod token;

// Re-export main types at crate root
pub use config::IdpConfig;
pub use error::{ConfigError, CredentialError, IdpError, TokenError};
pub use identity::{Identity, UserInfo};
pub use idp::{IdpClient, join_url};
pub use token::Claims;
