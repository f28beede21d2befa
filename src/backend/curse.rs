//! CurseForge backend (via the curse.tools API mirror)

use serde::Deserialize;

use crate::backend::{RemoteModInformation, http_client};
use crate::error::{ModsyncError, Result};

const API_BASE: &str = "https://api.curse.tools/v1/cf";

#[derive(Debug, Deserialize)]
struct ApiEnvelope {
    data: FileInformation,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FileInformation {
    display_name: String,
    file_name: String,
    download_url: Option<String>,
}

/// Resolve display name, filename and download URL for a Curse file
pub fn query(project_id: u32, file_id: u32) -> Result<RemoteModInformation> {
    let url = format!("{API_BASE}/mods/{project_id}/files/{file_id}");
    let name = format!("Project ID: {project_id}, File ID: {file_id}");

    let envelope: ApiEnvelope = http_client()?
        .get(&url)
        .send()
        .and_then(reqwest::blocking::Response::error_for_status)
        .and_then(reqwest::blocking::Response::json)
        .map_err(|e| ModsyncError::QueryFailed {
            name: name.clone(),
            backend: "Curse".to_string(),
            reason: e.to_string(),
        })?;

    let download_url = envelope.data.download_url.ok_or_else(|| ModsyncError::QueryFailed {
        name,
        backend: "Curse".to_string(),
        reason: "file has no download URL (distribution disabled by the author?)".to_string(),
    })?;

    Ok(RemoteModInformation {
        display_name: envelope.data.display_name,
        target_filename: envelope.data.file_name,
        download_url: Some(download_url),
    })
}
