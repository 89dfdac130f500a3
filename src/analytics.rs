use crate::google::{DriveClient, PeopleClient, ProviderError};
use serde::Serialize;
use tracing::debug;

/// Per-listing cap on Drive file counts. Only the first page is fetched,
/// so counts are an approximation for accounts with more items.
pub const FILE_PAGE_SIZE: u32 = 1000;

/// Drive search query matching files with limited visibility, used as
/// the externally-shared proxy metric.
pub const LIMITED_VISIBILITY_QUERY: &str = "visibility = 'limited'";

/// Combined risk-dashboard payload: file and permission counts merged
/// with profile data. Computed fresh per request, never cached.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateReport {
    pub public_files_count: usize,
    pub access_count: usize,
    pub external_files_count: usize,
    pub name: String,
    pub profile_pic_url: String,
}

/// Compute the aggregate report for the authenticated user.
///
/// The three Drive queries and the profile fetch are independent, so they
/// are issued concurrently and awaited jointly; if any one fails the whole
/// computation fails (no partial results).
pub async fn compute_report(
    drive: &DriveClient,
    people: &PeopleClient,
) -> Result<AggregateReport, ProviderError> {
    let (files, permissions, limited_files, profile) = tokio::try_join!(
        drive.list_files(FILE_PAGE_SIZE, None),
        drive.list_root_permissions(),
        drive.list_files(FILE_PAGE_SIZE, Some(LIMITED_VISIBILITY_QUERY)),
        people.get_profile(),
    )?;

    // Other users with explicit non-owner access to the Drive root.
    let access_count = permissions
        .iter()
        .filter(|p| p.principal_type == "user" && p.role != "owner")
        .count();

    debug!(
        public_files = files.len(),
        access_count,
        external_files = limited_files.len(),
        "Computed aggregate report"
    );

    Ok(AggregateReport {
        public_files_count: files.len(),
        access_count,
        external_files_count: limited_files.len(),
        name: profile.display_name,
        profile_pic_url: profile.picture_url,
    })
}
