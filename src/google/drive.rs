use super::types::{DriveFile, FileList, Permission, PermissionList};
use super::ProviderError;
use reqwest::StatusCode;
use tracing::debug;

/// Production Drive v3 API base URL.
pub const DRIVE_API_BASE: &str = "https://www.googleapis.com/drive/v3";

/// Drive API client scoped to a single request's access token.
///
/// Constructed fresh per inbound request so no authenticated state is
/// shared across requests; the underlying `reqwest::Client` is only a
/// connection pool.
pub struct DriveClient {
    http_client: reqwest::Client,
    base_url: String,
    access_token: String,
}

impl DriveClient {
    /// Create a client against the given base URL, `DRIVE_API_BASE` in
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

    /// List files visible to the caller, optionally filtered by a Drive
    /// search query. Fetches a single page; no pagination beyond it.
    pub async fn list_files(
        &self,
        page_size: u32,
        query: Option<&str>,
    ) -> Result<Vec<DriveFile>, ProviderError> {
        let url = format!("{}/files", self.base_url);

        let mut request = self
            .http_client
            .get(&url)
            .bearer_auth(&self.access_token)
            .query(&[("pageSize", page_size.to_string())]);

        if let Some(q) = query {
            request = request.query(&[("q", q)]);
        }

        let response = request.send().await?;
        let list: FileList = Self::parse_response(response).await?;

        debug!(count = list.files.len(), query = ?query, "Listed Drive files");
        Ok(list.files)
    }

    /// List permission entries on the Drive root resource.
    pub async fn list_root_permissions(&self) -> Result<Vec<Permission>, ProviderError> {
        let url = format!("{}/files/root/permissions", self.base_url);

        let response = self
            .http_client
            .get(&url)
            .bearer_auth(&self.access_token)
            .query(&[("fields", "kind, nextPageToken, permissions(role, type)")])
            .send()
            .await?;

        let list: PermissionList = Self::parse_response(response).await?;

        debug!(count = list.permissions.len(), "Listed root permissions");
        Ok(list.permissions)
    }

    /// Check the status and decode the body of a Drive API response.
    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ProviderError> {
        match response.status() {
            StatusCode::OK => response
                .json::<T>()
                .await
                .map_err(|e| ProviderError::MalformedResponse(e.to_string())),
            StatusCode::UNAUTHORIZED => Err(ProviderError::Unauthorized),
            status => {
                let message = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Unknown error".to_string());

                Err(ProviderError::Api {
                    status: status.as_u16(),
                    message,
                })
            }
        }
    }
}
