//! Bearer token time-validation.
//!
//! A credential is a three-segment dot-delimited JWT. Only the embedded
//! `exp` and `iat` claims are checked here; no cryptographic signature
//! verification is performed (see the crate-level trust model notes). A
//! deployment that needs full verification should validate the signature
//! before calling [`validate`] and treat this module purely as the
//! expiration check it is.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE;
use chrono::Utc;
use serde::Deserialize;

use crate::error::TokenError;

/// Tolerated clock skew, in seconds, between this host and the issuer.
const CLOCK_SKEW_SECONDS: i64 = 300;

/// Time claims extracted from a token payload.
///
/// A claim value of zero means the claim was absent and is not checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Claims {
    /// Expiration time as a Unix timestamp.
    #[serde(default)]
    pub exp: i64,
    /// Issued-at time as a Unix timestamp.
    #[serde(default)]
    pub iat: i64,
}

/// Validates a bearer token's time claims against the current clock.
///
/// # Errors
///
/// Returns [`TokenError::Malformed`] when the token does not parse,
/// [`TokenError::Expired`] when its expiration has passed, and
/// [`TokenError::NotYetValid`] when its issued-at time is more than
/// [`CLOCK_SKEW_SECONDS`] in the future.
pub fn validate(token: &str) -> Result<Claims, TokenError> {
    validate_at(token, Utc::now().timestamp())
}

/// Validates a bearer token's time claims against an explicit clock.
pub fn validate_at(token: &str, now: i64) -> Result<Claims, TokenError> {
    let claims = decode_claims(token)?;

    if claims.exp > 0 && now > claims.exp {
        return Err(TokenError::Expired {
            expires_at: claims.exp,
            now,
        });
    }

    if claims.iat > 0 && now < claims.iat - CLOCK_SKEW_SECONDS {
        return Err(TokenError::NotYetValid {
            issued_at: claims.iat,
            now,
        });
    }

    Ok(claims)
}

/// Decodes the claims segment of a token without checking them.
pub fn decode_claims(token: &str) -> Result<Claims, TokenError> {
    let segments: Vec<&str> = token.split('.').collect();
    if segments.len() != 3 {
        return Err(TokenError::Malformed {
            reason: format!("expected 3 segments, got {}", segments.len()),
        });
    }

    // Tokens in the wild drop base64 padding; re-add it before decoding.
    let mut payload = segments[1].to_string();
    if payload.len() % 4 != 0 {
        payload.push_str(&"=".repeat(4 - payload.len() % 4));
    }

    let decoded = URL_SAFE
        .decode(payload.as_bytes())
        .map_err(|e| TokenError::Malformed {
            reason: format!("payload is not valid base64: {e}"),
        })?;

    serde_json::from_slice(&decoded).map_err(|e| TokenError::Malformed {
        reason: format!("payload is not valid claims JSON: {e}"),
    })
}
