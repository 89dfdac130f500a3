use serde::{Deserialize, Serialize};

/// A Drive file entry; only identity fields are requested.
#[derive(Debug, Clone, Deserialize)]
pub struct DriveFile {
    #[serde(default)]
    pub id: Option<String>,

    #[serde(default)]
    pub name: Option<String>,
}

/// Response body of `GET /files`
#[derive(Debug, Deserialize)]
pub struct FileList {
    #[serde(default)]
    pub files: Vec<DriveFile>,
}

/// A single permission entry on a Drive resource
#[derive(Debug, Clone, Deserialize)]
pub struct Permission {
    pub role: String,

    /// Principal type: "user", "group", "domain", or "anyone"
    #[serde(rename = "type")]
    pub principal_type: String,
}

/// Response body of `GET /files/{id}/permissions`
#[derive(Debug, Deserialize)]
pub struct PermissionList {
    #[serde(default)]
    pub permissions: Vec<Permission>,
}

/// Response body of `GET /v1/people/me` (names and photos only)
#[derive(Debug, Deserialize)]
pub struct Person {
    #[serde(default)]
    pub names: Vec<PersonName>,

    #[serde(default)]
    pub photos: Vec<PersonPhoto>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonName {
    pub display_name: String,
}

#[derive(Debug, Deserialize)]
pub struct PersonPhoto {
    pub url: String,
}

/// The authenticated user's display name and photo
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub display_name: String,
    pub picture_url: String,
}
