use super::types::{Person, Profile};
use super::ProviderError;
use reqwest::StatusCode;
use tracing::debug;

/// Production People API base URL.
pub const PEOPLE_API_BASE: &str = "https://people.googleapis.com";

/// People API client scoped to a single request's access token.
pub struct PeopleClient {
    http_client: reqwest::Client,
    base_url: String,
    access_token: String,
}

impl PeopleClient {
    /// Create a client against the given base URL, `PEOPLE_API_BASE` in
    /// production.
    pub fn new_with_base_url(
        http_client: reqwest::Client,
        base_url: String,
        access_token: impl Into<String>,
    ) -> Self {
        Self {
            http_client,
            base_url,
            access_token: access_token.into(),
        }
    }

    /// Fetch the authenticated user's display name and photo.
    pub async fn get_profile(&self) -> Result<Profile, ProviderError> {
        let url = format!("{}/v1/people/me", self.base_url);

        let response = self
            .http_client
            .get(&url)
            .bearer_auth(&self.access_token)
            .query(&[("personFields", "names,photos")])
            .send()
            .await?;

        let person: Person = match response.status() {
            StatusCode::OK => response
                .json()
                .await
                .map_err(|e| ProviderError::MalformedResponse(e.to_string()))?,
            StatusCode::UNAUTHORIZED => return Err(ProviderError::Unauthorized),
            status => {
                let message = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Unknown error".to_string());

                return Err(ProviderError::Api {
                    status: status.as_u16(),
                    message,
                });
            }
        };

        let display_name = person
            .names
            .into_iter()
            .next()
            .map(|n| n.display_name)
            .ok_or_else(|| ProviderError::MalformedResponse("person has no names".to_string()))?;

        let picture_url = person
            .photos
            .into_iter()
            .next()
            .map(|p| p.url)
            .ok_or_else(|| ProviderError::MalformedResponse("person has no photos".to_string()))?;

        debug!(display_name = %display_name, "Fetched profile");

        Ok(Profile {
            display_name,
            picture_url,
        })
    }
}
