//! The authenticated identity and the raw provider profile it comes from.
//!
//! An [`Identity`] is constructed fresh on every gated request from a
//! userinfo lookup; nothing is cached between requests.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An authenticated user, as exposed to downstream handlers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// The provider subject claim - unique identifier for the user.
    pub id: String,
    /// The user's email address.
    pub email: String,
    /// The user's short display name.
    pub username: String,
    /// Remaining profile fields, keyed by their provider claim name.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
}

/// The raw userinfo profile returned by the identity provider.
#[derive(Debug, Clone, Deserialize)]
pub struct UserInfo {
    pub sub: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub nickname: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub given_name: Option<String>,
    #[serde(default)]
    pub family_name: Option<String>,
    #[serde(default)]
    pub picture: Option<String>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<UserInfo> for Identity {
    fn from(info: UserInfo) -> Self {
        let mut attributes = BTreeMap::new();
        for (key, value) in [
            ("name", info.name),
            ("given_name", info.given_name),
            ("family_name", info.family_name),
            ("picture", info.picture),
        ] {
            if let Some(value) = value {
                attributes.insert(key.to_string(), value);
            }
        }
        if let Some(updated_at) = info.updated_at {
            attributes.insert("updated_at".to_string(), updated_at.to_rfc3339());
        }

        Self {
            id: info.sub,
            email: info.email.unwrap_or_default(),
            username: info.nickname.unwrap_or_default(),
            attributes,
        }
    }
}
