//! Error types for the authentication core.
//!
//! - `TokenError`: failures from time-validating a bearer token
//! - `CredentialError`: failures reading the credential from a request
//! - `IdpError`: failures talking to the identity provider
//! - `ConfigError`: missing identity provider configuration (fatal at startup)
//!
//! Display implementations never include credential material.

use std::fmt;

/// Errors from validating a bearer token's embedded claims.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// The token is not a well-formed three-segment JWT.
    Malformed { reason: String },
    /// The token's expiration time has passed.
    Expired { expires_at: i64, now: i64 },
    /// The token claims to have been issued in the future.
    NotYetValid { issued_at: i64, now: i64 },
}

impl fmt::Display for TokenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed { reason } => {
                write!(f, "malformed token: {reason}")
            }
            Self::Expired { expires_at, now } => {
                write!(f, "token expired: exp={expires_at}, now={now}")
            }
            Self::NotYetValid { issued_at, now } => {
                write!(f, "token issued in the future: iat={issued_at}, now={now}")
            }
        }
    }
}

impl std::error::Error for TokenError {}

/// Errors from reading the credential carried by a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialError {
    /// No auth token cookie was present on the request.
    NoCookie,
    /// The auth token cookie was present but empty.
    EmptyCredential,
}

impl fmt::Display for CredentialError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoCookie => write!(f, "auth token cookie is not set"),
            Self::EmptyCredential => write!(f, "auth token cookie is empty"),
        }
    }
}

impl std::error::Error for CredentialError {}

/// Errors from the identity provider client.
///
/// `status` is `None` when the request failed in transport before a
/// response was received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdpError {
    /// The authorization-code-to-token exchange failed.
    ExchangeFailed { status: Option<u16>, detail: String },
    /// The userinfo endpoint returned an error.
    ProfileFetchFailed { status: Option<u16>, detail: String },
    /// The userinfo response body was not a valid profile.
    ProfileDecodeFailed { detail: String },
    /// The underlying HTTP client could not be constructed.
    Client { detail: String },
}

impl fmt::Display for IdpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ExchangeFailed {
                status: Some(status),
                detail,
            } => {
                write!(f, "token exchange failed with status {status}: {detail}")
            }
            Self::ExchangeFailed {
                status: None,
                detail,
            } => {
                write!(f, "token exchange request failed: {detail}")
            }
            Self::ProfileFetchFailed {
                status: Some(status),
                detail,
            } => {
                write!(f, "userinfo endpoint returned status {status}: {detail}")
            }
            Self::ProfileFetchFailed {
                status: None,
                detail,
            } => {
                write!(f, "userinfo request failed: {detail}")
            }
            Self::ProfileDecodeFailed { detail } => {
                write!(f, "failed to decode userinfo response: {detail}")
            }
            Self::Client { detail } => {
                write!(f, "failed to build HTTP client: {detail}")
            }
        }
    }
}

impl std::error::Error for IdpError {}

/// Missing or empty identity provider configuration.
///
/// Raised at startup; the gateway refuses to serve rather than running
/// with authentication silently disabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// A required configuration field is empty.
    MissingField { name: &'static str },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingField { name } => {
                write!(f, "required configuration '{name}' is not set or is empty")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
