pub mod drive;
pub mod people;
pub mod types;

pub use drive::{DriveClient, DRIVE_API_BASE};
pub use people::{PeopleClient, PEOPLE_API_BASE};
pub use types::{DriveFile, Permission, Profile};

use thiserror::Error;

/// Error types for Drive/People API operations
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unauthorized - token may be expired")]
    Unauthorized,

    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Malformed provider response: {0}")]
    MalformedResponse(String),
}
