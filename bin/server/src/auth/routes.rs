//! Flow endpoints for login, callback, and logout.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Redirect, Response},
};
use axum_extra::extract::CookieJar;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

use super::{AppState, cookie};

/// Query parameters for the login endpoint.
#[derive(Debug, Deserialize)]
pub struct LoginQuery {
    /// Where to send the browser after a successful flow.
    #[serde(default)]
    return_url: Option<String>,
}

/// Query parameters for the OAuth2 callback.
#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    state: Option<String>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
}

/// Initiates the login flow by redirecting to the identity provider.
pub async fn login(State(state): State<Arc<AppState>>, Query(query): Query<LoginQuery>) -> Redirect {
    let return_url = query
        .return_url
        .filter(|url| !url.is_empty())
        .unwrap_or_else(|| "/".to_string());

    Redirect::temporary(&state.idp.authorize_url(&return_url))
}

/// Handles the identity provider's redirect back after authentication.
///
/// Errors here are surfaced as JSON error responses rather than redirects:
/// without a completed exchange there is no trustworthy destination to
/// redirect to.
pub async fn callback(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CallbackQuery>,
    jar: CookieJar,
) -> Result<(CookieJar, Redirect), CallbackError> {
    if let Some(code) = query.error {
        return Err(CallbackError::Provider {
            code,
            description: query.error_description,
        });
    }

    let code = query
        .code
        .filter(|code| !code.is_empty())
        .ok_or(CallbackError::MissingCode)?;

    // `state` arrives percent-decoded from the query parser.
    let return_url = query
        .state
        .filter(|url| !url.is_empty())
        .unwrap_or_else(|| "/".to_string());

    tracing::info!("exchanging authorization code");
    let tokens = state
        .idp
        .exchange_code(&code)
        .await
        .map_err(|error| CallbackError::Exchange {
            details: error.to_string(),
        })?;

    let access_token = tokens
        .get("access_token")
        .and_then(|value| value.as_str())
        .ok_or(CallbackError::MissingAccessToken)?;

    let jar = jar.add(cookie::session_cookie(access_token.to_string()));
    tracing::info!("token obtained and session cookie set");

    Ok((jar, Redirect::temporary(&return_url)))
}

/// Clears the session cookie and redirects to the provider's logout
/// endpoint, which returns the browser to the application base URL.
pub async fn logout(State(state): State<Arc<AppState>>, jar: CookieJar) -> (CookieJar, Redirect) {
    let jar = jar.add(cookie::clear_session_cookie());
    (jar, Redirect::temporary(&state.idp.logout_url()))
}

/// Errors surfaced by the callback endpoint.
#[derive(Debug)]
pub enum CallbackError {
    /// The provider reported an error instead of a code.
    Provider {
        code: String,
        description: Option<String>,
    },
    /// No authorization code in the callback query.
    MissingCode,
    /// The code-for-token exchange failed.
    Exchange { details: String },
    /// The provider's token response had no usable access token.
    MissingAccessToken,
}

impl IntoResponse for CallbackError {
    fn into_response(self) -> Response {
        match self {
            Self::Provider { code, description } => (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "error": code,
                    "error_description": description.unwrap_or_default(),
                })),
            )
                .into_response(),
            Self::MissingCode => (
                StatusCode::BAD_REQUEST,
                Json(json!({"error": "Authorization code not provided"})),
            )
                .into_response(),
            Self::Exchange { details } => {
                tracing::error!(details = %details, "failed to exchange code for token");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "error": "Failed to exchange code for token",
                        "details": details,
                    })),
                )
                    .into_response()
            }
            Self::MissingAccessToken => {
                tracing::error!("access token not found in token response");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({"error": "Access token not found in response"})),
                )
                    .into_response()
            }
        }
    }
}
