//! Modrinth backend

use serde::Deserialize;

use crate::backend::{RemoteModInformation, http_client};
use crate::error::{ModsyncError, Result};

const API_BASE: &str = "https://api.modrinth.com/v2";

#[derive(Debug, Deserialize)]
struct VersionInformation {
    name: String,
    files: Vec<VersionFile>,
}

#[derive(Debug, Deserialize)]
struct VersionFile {
    url: String,
    filename: String,
    #[serde(default)]
    primary: bool,
}

/// Resolve display name, filename and download URL for a Modrinth version
pub fn query(project_id: &str, version_id: &str) -> Result<RemoteModInformation> {
    let url = format!("{API_BASE}/project/{project_id}/version/{version_id}");
    let name = format!("Project ID: {project_id}, Version ID: {version_id}");

    let version: VersionInformation = http_client()?
        .get(&url)
        .send()
        .and_then(reqwest::blocking::Response::error_for_status)
        .and_then(reqwest::blocking::Response::json)
        .map_err(|e| ModsyncError::QueryFailed {
            name: name.clone(),
            backend: "Modrinth".to_string(),
            reason: e.to_string(),
        })?;

    // Prefer the file flagged primary, falling back to the first listed
    let file = version
        .files
        .iter()
        .find(|f| f.primary)
        .or_else(|| version.files.first())
        .ok_or_else(|| ModsyncError::QueryFailed {
            name,
            backend: "Modrinth".to_string(),
            reason: "version has no files".to_string(),
        })?;

    Ok(RemoteModInformation {
        display_name: version.name.clone(),
        target_filename: file.filename.clone(),
        download_url: Some(file.url.clone()),
    })
}
