use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

/// Fields of interest from Google's tokeninfo endpoint. All optional;
/// a well-formed body is enough to consider the token live.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenInfo {
    #[serde(default)]
    pub scope: Option<String>,

    #[serde(default)]
    pub expires_in: Option<String>,

    #[serde(default)]
    pub aud: Option<String>,
}

/// Outcome of a token introspection round-trip.
///
/// "Provider unreachable" is deliberately kept apart from "token rejected"
/// so a transient network blip is never reported to the caller as an
/// invalid token.
#[derive(Debug)]
pub enum Validity {
    /// The provider confirmed the token is currently live.
    Valid(TokenInfo),
    /// The provider explicitly rejected the token.
    Invalid,
    /// The provider could not be consulted (network error, 5xx,
    /// or an unparseable success body).
    Unreachable(String),
}

impl Validity {
    pub fn is_valid(&self) -> bool {
        matches!(self, Validity::Valid(_))
    }
}

/// Validates access tokens against Google's tokeninfo endpoint.
///
/// Every check is a fresh round-trip; results are never cached, since a
/// validity result only gates the request it was computed for.
pub struct TokenValidator {
    http_client: Client,
    tokeninfo_endpoint: String,
}

impl TokenValidator {
    /// Create a validator against the production endpoint.
    pub fn new(http_client: Client) -> Self {
        Self {
            http_client,
            tokeninfo_endpoint: "https://www.googleapis.com/oauth2/v3/tokeninfo".to_string(),
        }
    }

    /// Create a validator with a custom endpoint (for testing).
    pub fn new_with_endpoint(http_client: Client, endpoint: String) -> Self {
        Self {
            http_client,
            tokeninfo_endpoint: endpoint,
        }
    }

    /// Introspect a single access token. No retries.
    pub async fn check(&self, access_token: &str) -> Validity {
        debug!(
            endpoint = %self.tokeninfo_endpoint,
            "Calling tokeninfo endpoint"
        );

        let response = match self
            .http_client
            .get(&self.tokeninfo_endpoint)
            .query(&[("access_token", access_token)])
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!(
                    error = %e,
                    endpoint = %self.tokeninfo_endpoint,
                    "Tokeninfo endpoint unreachable"
                );
                return Validity::Unreachable(format!("HTTP request failed: {}", e));
            }
        };

        let status = response.status();

        if status.is_client_error() {
            debug!(status = %status, "Tokeninfo rejected token");
            return Validity::Invalid;
        }

        if !status.is_success() {
            warn!(status = %status, "Tokeninfo returned non-2xx status");
            return Validity::Unreachable(format!("tokeninfo returned status {}", status));
        }

        match response.json::<TokenInfo>().await {
            Ok(info) => {
                debug!(scope = ?info.scope, "Token confirmed valid");
                Validity::Valid(info)
            }
            Err(e) => {
                warn!(error = %e, "Failed to parse tokeninfo response");
                Validity::Unreachable(format!("Failed to parse response: {}", e))
            }
        }
    }
}
