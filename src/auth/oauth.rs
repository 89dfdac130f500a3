use super::types::{AuthError, TokenBundle};
use crate::config::Config;
use oauth2::{
    basic::BasicClient, reqwest::async_http_client, AuthUrl, AuthorizationCode, ClientId,
    ClientSecret, RedirectUrl, TokenResponse, TokenUrl,
};
use url::Url;

// Google OAuth2 endpoints
const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const GOOGLE_REVOKE_URL: &str = "https://oauth2.googleapis.com/revoke";

/// Scopes requested on every consent URL: read-only Drive metadata,
/// basic profile, and per-file Drive access.
pub const SCOPES: [&str; 3] = [
    "https://www.googleapis.com/auth/drive.metadata.readonly",
    "https://www.googleapis.com/auth/userinfo.profile",
    "https://www.googleapis.com/auth/drive.file",
];

/// OAuth2 client for Google authentication
pub struct GoogleOAuthClient {
    client: BasicClient,
    http_client: reqwest::Client,
    auth_base: Url,
    revoke_url: Url,
    client_id: String,
    redirect_uri: String,
}

impl GoogleOAuthClient {
    /// Create a new Google OAuth2 client against the production endpoints
    pub fn new(config: &Config) -> Result<Self, AuthError> {
        Self::new_with_endpoints(config, GOOGLE_AUTH_URL, GOOGLE_TOKEN_URL, GOOGLE_REVOKE_URL)
    }

    /// Create a client with custom provider endpoints (for testing)
    pub fn new_with_endpoints(
        config: &Config,
        auth_url: &str,
        token_url: &str,
        revoke_url: &str,
    ) -> Result<Self, AuthError> {
        let client_id = ClientId::new(config.client_id.clone());
        let client_secret = ClientSecret::new(config.client_secret.clone());

        let auth_base = Url::parse(auth_url)
            .map_err(|e| AuthError::OAuth2Error(format!("Invalid auth URL: {}", e)))?;

        let oauth_auth_url = AuthUrl::new(auth_url.to_string())
            .map_err(|e| AuthError::OAuth2Error(format!("Invalid auth URL: {}", e)))?;

        let token_url = TokenUrl::new(token_url.to_string())
            .map_err(|e| AuthError::OAuth2Error(format!("Invalid token URL: {}", e)))?;

        let revoke_url = Url::parse(revoke_url)
            .map_err(|e| AuthError::OAuth2Error(format!("Invalid revocation URL: {}", e)))?;

        let redirect_url = RedirectUrl::new(config.redirect_uri.clone())
            .map_err(|e| AuthError::OAuth2Error(format!("Invalid redirect URI: {}", e)))?;

        let client =
            BasicClient::new(client_id, Some(client_secret), oauth_auth_url, Some(token_url))
                .set_redirect_uri(redirect_url);

        Ok(Self {
            client,
            http_client: reqwest::Client::new(),
            auth_base,
            revoke_url,
            client_id: config.client_id.clone(),
            redirect_uri: config.redirect_uri.clone(),
        })
    }

    /// Build the consent URL, requesting offline access so Google issues
    /// a refresh token.
    ///
    /// Deterministic: the same configuration always yields the same URL.
    pub fn authorization_url(&self) -> String {
        let mut url = self.auth_base.clone();
        url.query_pairs_mut()
            .append_pair("client_id", &self.client_id)
            .append_pair("redirect_uri", &self.redirect_uri)
            .append_pair("response_type", "code")
            .append_pair("access_type", "offline")
            .append_pair("scope", &SCOPES.join(" "));
        url.to_string()
    }

    /// Exchange an authorization code for a token bundle.
    ///
    /// Fails if the code is invalid, expired, or already consumed.
    pub async fn exchange_code(&self, code: String) -> Result<TokenBundle, AuthError> {
        let token_response = self
            .client
            .exchange_code(AuthorizationCode::new(code))
            .request_async(async_http_client)
            .await
            .map_err(|e| match e {
                oauth2::RequestTokenError::ServerResponse(resp) => {
                    AuthError::ExchangeFailed(resp.to_string())
                }
                other => AuthError::ExchangeFailed(other.to_string()),
            })?;

        let access_token = token_response.access_token().secret().to_string();
        let refresh_token = token_response
            .refresh_token()
            .map(|t| t.secret().to_string());
        let expires_in = token_response
            .expires_in()
            .map(|d| d.as_secs())
            .unwrap_or(3600); // Default to 1 hour if not specified
        let scope = token_response.scopes().map(|scopes| {
            scopes
                .iter()
                .map(|s| s.as_str())
                .collect::<Vec<_>>()
                .join(" ")
        });

        let mut bundle = TokenBundle::new(access_token, refresh_token, expires_in);
        bundle.scope = scope;
        Ok(bundle)
    }

    /// Revoke an access token with the provider.
    ///
    /// Posted as form data straight to the revoke endpoint, the same way
    /// the validator talks to tokeninfo.
    pub async fn revoke(&self, access_token: &str) -> Result<(), AuthError> {
        let response = self
            .http_client
            .post(self.revoke_url.clone())
            .form(&[("token", access_token)])
            .send()
            .await
            .map_err(|e| AuthError::RevocationFailed(format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());

        Err(AuthError::RevocationFailed(format!(
            "revoke endpoint returned status {}: {}",
            status.as_u16(),
            message
        )))
    }
}
