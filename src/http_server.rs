use crate::analytics::compute_report;
use crate::auth::{GoogleOAuthClient, TokenBundle, TokenValidator, Validity};
use crate::google::{DriveClient, PeopleClient, DRIVE_API_BASE, PEOPLE_API_BASE};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tower_http::cors::CorsLayer;
use tracing::{error, info, warn};

/// Base URLs for the Drive and People APIs, overridable in tests.
#[derive(Debug, Clone)]
pub struct ProviderEndpoints {
    pub drive_base: String,
    pub people_base: String,
}

impl Default for ProviderEndpoints {
    fn default() -> Self {
        Self {
            drive_base: DRIVE_API_BASE.to_string(),
            people_base: PEOPLE_API_BASE.to_string(),
        }
    }
}

/// Shared application state.
///
/// Holds no per-caller credentials: provider clients are constructed fresh
/// per request from the caller-supplied token, over the shared connection
/// pool.
#[derive(Clone)]
pub struct AppState {
    pub oauth_client: Arc<GoogleOAuthClient>,
    pub token_validator: Arc<TokenValidator>,
    pub endpoints: Arc<ProviderEndpoints>,
    pub http_client: reqwest::Client,
}

/// Errors surfaced to HTTP callers, each mapped to a fixed status code
/// and a JSON envelope `{"error": kind, "message": text}`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Missing required field: {0}")]
    MissingInput(&'static str),

    #[error("Token is invalid")]
    InvalidToken,

    #[error("Token validation unavailable: {0}")]
    ProviderUnreachable(String),

    #[error("Error retrieving access token: {0}")]
    TokenExchange(String),

    #[error("Error fetching user profile: {0}")]
    ProfileFetch(String),

    #[error("Error calculating risk score: {0}")]
    Aggregation(String),

    #[error("Error revoking credentials: {0}")]
    Revocation(String),
}

impl ApiError {
    fn kind(&self) -> &'static str {
        match self {
            ApiError::MissingInput(_) => "missing_input",
            ApiError::InvalidToken => "invalid_token",
            ApiError::ProviderUnreachable(_) => "provider_unreachable",
            ApiError::TokenExchange(_) => "token_exchange_failed",
            ApiError::ProfileFetch(_) => "profile_fetch_failed",
            ApiError::Aggregation(_) => "aggregation_failed",
            ApiError::Revocation(_) => "revocation_failed",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingInput(_)
            | ApiError::InvalidToken
            | ApiError::TokenExchange(_)
            | ApiError::Revocation(_) => StatusCode::BAD_REQUEST,
            ApiError::ProviderUnreachable(_) => StatusCode::BAD_GATEWAY,
            ApiError::ProfileFetch(_) | ApiError::Aggregation(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": self.kind(),
            "message": self.to_string(),
        }));
        (self.status(), body).into_response()
    }
}

#[derive(Debug, Deserialize)]
struct CodeRequest {
    code: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TokenRequest {
    token: Option<TokenField>,
}

/// Request-side view of the posted token. Every field is optional so an
/// incomplete body reaches `require_valid_token` and gets the error
/// envelope, not the extractor's 422.
#[derive(Debug, Deserialize)]
struct TokenField {
    #[serde(default)]
    access_token: Option<String>,
}

/// Liveness marker
async fn root() -> &'static str {
    "Drive risk API running"
}

/// GET /getAuthURL - build the Google consent URL
async fn get_auth_url(State(state): State<AppState>) -> String {
    let auth_url = state.oauth_client.authorization_url();
    info!(auth_url = %auth_url, "Issued consent URL");
    auth_url
}

/// POST /getToken - exchange an authorization code for a token bundle
async fn get_token(
    State(state): State<AppState>,
    Json(body): Json<CodeRequest>,
) -> Result<Json<TokenBundle>, ApiError> {
    let code = body.code.ok_or(ApiError::MissingInput("code"))?;

    let bundle = state.oauth_client.exchange_code(code).await.map_err(|e| {
        error!(error = %e, "Authorization code exchange failed");
        ApiError::TokenExchange(e.to_string())
    })?;

    info!("Exchanged authorization code for tokens");
    Ok(Json(bundle))
}

/// POST /getUserInfo - fetch the authenticated user's profile
async fn get_user_info(
    State(state): State<AppState>,
    Json(body): Json<TokenRequest>,
) -> Result<Response, ApiError> {
    let access_token = require_valid_token(&state, body.token).await?;

    let people = PeopleClient::new_with_base_url(
        state.http_client.clone(),
        state.endpoints.people_base.clone(),
        access_token,
    );

    let profile = people.get_profile().await.map_err(|e| {
        error!(error = %e, "Profile fetch failed");
        ApiError::ProfileFetch(e.to_string())
    })?;

    Ok(Json(profile).into_response())
}

/// POST /analytics - compute the aggregate risk report
async fn analytics(
    State(state): State<AppState>,
    Json(body): Json<TokenRequest>,
) -> Result<Response, ApiError> {
    let access_token = require_valid_token(&state, body.token).await?;

    let drive = DriveClient::new_with_base_url(
        state.http_client.clone(),
        state.endpoints.drive_base.clone(),
        access_token.clone(),
    );
    let people = PeopleClient::new_with_base_url(
        state.http_client.clone(),
        state.endpoints.people_base.clone(),
        access_token,
    );

    let report = compute_report(&drive, &people).await.map_err(|e| {
        error!(error = %e, "Aggregate report computation failed");
        ApiError::Aggregation(e.to_string())
    })?;

    Ok(Json(report).into_response())
}

/// DELETE /revoke - invalidate the caller's token with Google
async fn revoke(
    State(state): State<AppState>,
    Json(body): Json<TokenRequest>,
) -> Result<&'static str, ApiError> {
    let access_token = require_valid_token(&state, body.token).await?;

    state
        .oauth_client
        .revoke(&access_token)
        .await
        .map_err(|e| {
            error!(error = %e, "Token revocation failed");
            ApiError::Revocation(e.to_string())
        })?;

    info!("Credentials revoked");
    Ok("Revoked")
}

/// Reject the request unless a token is present and the provider confirms
/// it is currently valid. Runs before any other provider call.
async fn require_valid_token(
    state: &AppState,
    token: Option<TokenField>,
) -> Result<String, ApiError> {
    let token = token.ok_or(ApiError::MissingInput("token"))?;
    let access_token = token
        .access_token
        .ok_or(ApiError::MissingInput("token.access_token"))?;

    match state.token_validator.check(&access_token).await {
        Validity::Valid(_) => Ok(access_token),
        Validity::Invalid => {
            warn!("Rejected request with invalid token");
            Err(ApiError::InvalidToken)
        }
        Validity::Unreachable(reason) => {
            warn!(reason = %reason, "Token introspection unreachable");
            Err(ApiError::ProviderUnreachable(reason))
        }
    }
}

/// Create and configure the HTTP router
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/getAuthURL", get(get_auth_url))
        .route("/getToken", post(get_token))
        .route("/getUserInfo", post(get_user_info))
        .route("/analytics", post(analytics))
        .route("/revoke", delete(revoke))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Run the HTTP server
pub async fn run_server(port: u16, state: AppState) -> std::io::Result<()> {
    let app = create_app(state);
    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("Drive risk API listening on {}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
