use drive_risk_server::{AppState, Config, GoogleOAuthClient, ProviderEndpoints, TokenValidator};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // LOG_FORMAT=json for production, pretty (or unset) for development
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "drive_risk_server=info".into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }

    let config = Config::from_file()?;
    info!("Configuration loaded");

    let http_client = reqwest::Client::new();

    let state = AppState {
        oauth_client: Arc::new(GoogleOAuthClient::new(&config)?),
        token_validator: Arc::new(TokenValidator::new(http_client.clone())),
        endpoints: Arc::new(ProviderEndpoints::default()),
        http_client,
    };

    info!(port = config.port, "Starting Drive risk API");
    drive_risk_server::run_server(config.port, state).await?;

    Ok(())
}
