pub mod analytics;
pub mod auth;
pub mod config;
pub mod google;
pub mod http_server;

pub use analytics::{compute_report, AggregateReport};
pub use auth::{AuthError, GoogleOAuthClient, TokenBundle, TokenValidator, Validity};
pub use config::Config;
pub use google::{DriveClient, PeopleClient, ProviderError};
pub use http_server::{create_app, run_server, AppState, ProviderEndpoints};
