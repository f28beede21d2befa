//! Remote backends: metadata queries and byte transfer
//!
//! Each [`RemoteSource`] variant is handled by its own submodule; dispatch is
//! a `match` on the closed enum. Backends resolve a [`RemoteModInformation`]
//! (display name, final filename and, where the backend knows it, the
//! download URL) and copy remote bytes to a target path through a
//! [`ProgressSink`].

pub mod curse;
pub mod modrinth;
pub mod url;

use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;
use std::time::Duration;

use crate::config::{ModDescriptor, RemoteSource};
use crate::error::{ModsyncError, Result};
use crate::progress::ProgressSink;

/// Resolved display name and on-disk filename for one descriptor.
///
/// Recomputed each run; cached per descriptor within a run to avoid duplicate
/// remote queries.
#[derive(Debug, Clone)]
pub struct RemoteModInformation {
    pub display_name: String,
    pub target_filename: String,
    /// Direct download URL when the query already resolved one
    pub download_url: Option<String>,
}

/// Query the descriptor's backend for its remote information.
///
/// An explicit `fileName` on the descriptor overrides the resolved filename,
/// exactly like the original configuration convention.
pub fn query_information(descriptor: &ModDescriptor) -> Result<RemoteModInformation> {
    let mut information = match &descriptor.source {
        RemoteSource::Curse {
            project_id,
            file_id,
        } => curse::query(*project_id, *file_id)?,
        RemoteSource::Modrinth {
            project_id,
            version_id,
        } => modrinth::query(project_id, version_id)?,
        RemoteSource::Url { url } => url::query(url, descriptor.file_name.as_deref())?,
    };

    if let Some(file_name) = &descriptor.file_name {
        information.display_name = file_name.clone();
        information.target_filename = file_name.clone();
    }

    Ok(information)
}

/// Transfer the descriptor's bytes to the target path
pub fn perform_install(
    descriptor: &ModDescriptor,
    information: &RemoteModInformation,
    target: &Path,
    sink: &dyn ProgressSink,
) -> Result<()> {
    let url = information
        .download_url
        .as_deref()
        .ok_or_else(|| ModsyncError::DownloadFailed {
            name: descriptor.offline_name(),
            reason: "no download URL resolved".to_string(),
        })?;

    download_to(url, target, sink).map_err(|e| ModsyncError::DownloadFailed {
        name: descriptor.offline_name(),
        reason: e.to_string(),
    })
}

/// Shared blocking HTTP client for backend calls
pub(crate) fn http_client() -> Result<reqwest::blocking::Client> {
    reqwest::blocking::Client::builder()
        .user_agent(concat!("modsync/", env!("CARGO_PKG_VERSION")))
        .timeout(Duration::from_secs(300))
        .build()
        .map_err(|e| ModsyncError::IoError {
            message: format!("failed to build HTTP client: {e}"),
        })
}

fn download_to(url: &str, target: &Path, sink: &dyn ProgressSink) -> Result<()> {
    let client = http_client()?;
    let response = client
        .get(url)
        .send()
        .and_then(reqwest::blocking::Response::error_for_status)
        .map_err(|e| ModsyncError::IoError {
            message: e.to_string(),
        })?;

    sink.begin(response.content_length());

    let file = File::create(target).map_err(|e| ModsyncError::FileWriteFailed {
        path: target.display().to_string(),
        reason: e.to_string(),
    })?;
    let mut writer = BufWriter::new(file);
    let mut reader = response;
    let mut buffer = [0u8; 8192];

    loop {
        let bytes_read = reader.read(&mut buffer).map_err(|e| ModsyncError::IoError {
            message: e.to_string(),
        })?;
        if bytes_read == 0 {
            break;
        }
        writer
            .write_all(&buffer[..bytes_read])
            .map_err(|e| ModsyncError::FileWriteFailed {
                path: target.display().to_string(),
                reason: e.to_string(),
            })?;
        sink.advance(bytes_read as u64);
    }

    writer.flush().map_err(|e| ModsyncError::FileWriteFailed {
        path: target.display().to_string(),
        reason: e.to_string(),
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url_descriptor(url: &str, file_name: Option<&str>) -> ModDescriptor {
        serde_json::from_value(match file_name {
            Some(name) => serde_json::json!({"type": "url", "url": url, "fileName": name}),
            None => serde_json::json!({"type": "url", "url": url}),
        })
        .unwrap()
    }

    #[test]
    fn test_query_information_filename_override() {
        let descriptor =
            url_descriptor("https://example.com/files/remote-name.jar", Some("local.jar"));
        let info = query_information(&descriptor).unwrap();
        assert_eq!(info.target_filename, "local.jar");
        assert_eq!(info.display_name, "local.jar");
    }

    #[test]
    fn test_query_information_url_derives_filename() {
        let descriptor = url_descriptor("https://example.com/files/foo.jar?version=3", None);
        let info = query_information(&descriptor).unwrap();
        assert_eq!(info.target_filename, "foo.jar");
        assert_eq!(
            info.download_url.as_deref(),
            Some("https://example.com/files/foo.jar?version=3")
        );
    }
}
