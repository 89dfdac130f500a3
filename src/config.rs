use serde::Deserialize;
use std::fs;
use std::path::PathBuf;
use thiserror::Error;

/// Default listening port when `PORT` is unset.
pub const DEFAULT_PORT: u16 = 5000;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Credentials file not found at {path}: {reason}")]
    FileNotFound { path: String, reason: String },

    #[error("Credentials file has no redirect URIs")]
    MissingRedirectUri,

    #[error("Invalid redirect URI: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Failed to read credentials file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::error::Error),
}

/// Google OAuth client credentials file, as downloaded from the
/// Google Cloud Console ("Web application" client type).
#[derive(Debug, Deserialize)]
struct CredentialsFile {
    web: WebCredentials,
}

#[derive(Debug, Deserialize)]
struct WebCredentials {
    client_id: String,
    client_secret: String,
    redirect_uris: Vec<String>,
}

/// Runtime configuration for the risk relay.
#[derive(Debug, Clone)]
pub struct Config {
    /// Google OAuth2 client ID
    pub client_id: String,

    /// Google OAuth2 client secret
    pub client_secret: String,

    /// OAuth2 redirect URI (first entry of the credentials file)
    pub redirect_uri: String,

    /// HTTP listening port
    pub port: u16,
}

impl Config {
    /// Load configuration from the credentials file.
    ///
    /// The path comes from `GOOGLE_CREDENTIALS`, defaulting to
    /// `credentials.json` in the working directory. The listening port
    /// comes from `PORT`, defaulting to 5000.
    pub fn from_file() -> Result<Self, ConfigError> {
        let path = Self::credentials_path();

        let contents = fs::read_to_string(&path).map_err(|e| ConfigError::FileNotFound {
            path: path.display().to_string(),
            reason: format!(
                "{}. Download the OAuth client JSON from the Google Cloud Console \
                 and save it as credentials.json (or point GOOGLE_CREDENTIALS at it).",
                e
            ),
        })?;

        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        Self::parse(&contents, port)
    }

    /// Parse a credentials JSON document into a `Config`.
    pub fn parse(contents: &str, port: u16) -> Result<Self, ConfigError> {
        let file: CredentialsFile = serde_json::from_str(contents)?;

        let redirect_uri = file
            .web
            .redirect_uris
            .into_iter()
            .next()
            .ok_or(ConfigError::MissingRedirectUri)?;

        let _ = url::Url::parse(&redirect_uri)?;

        Ok(Config {
            client_id: file.web.client_id,
            client_secret: file.web.client_secret,
            redirect_uri,
            port,
        })
    }

    fn credentials_path() -> PathBuf {
        std::env::var("GOOGLE_CREDENTIALS")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("credentials.json"))
    }
}
