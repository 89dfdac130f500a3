use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

/// Token bundle issued by Google's OAuth2 token endpoint.
///
/// The relay never stores these; callers hold the bundle and send it back
/// on every request. Deserialization is lenient so a caller may post only
/// the access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenBundle {
    pub access_token: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,

    /// Unix timestamp of access token expiry.
    #[serde(default)]
    pub expires_at: u64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
}

impl TokenBundle {
    /// Create a new token bundle from an expires-in duration.
    pub fn new(access_token: String, refresh_token: Option<String>, expires_in: u64) -> Self {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("Time went backwards")
            .as_secs();

        Self {
            access_token,
            refresh_token,
            expires_at: now + expires_in,
            scope: None,
            token_type: Some("Bearer".to_string()),
        }
    }

    /// Check if the access token is expired (with 60s buffer).
    pub fn is_expired(&self) -> bool {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("Time went backwards")
            .as_secs();

        self.expires_at <= now + 60
    }
}

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("OAuth2 error: {0}")]
    OAuth2Error(String),

    #[error("Code exchange failed: {0}")]
    ExchangeFailed(String),

    #[error("Revocation failed: {0}")]
    RevocationFailed(String),
}
