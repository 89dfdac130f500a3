pub mod oauth;
pub mod token_validator;
pub mod types;

pub use oauth::GoogleOAuthClient;
pub use token_validator::{TokenInfo, TokenValidator, Validity};
pub use types::{AuthError, TokenBundle};
