//! Raw-URL backend
//!
//! The filename is derived from the URL path (or taken from the descriptor's
//! explicit override), so this backend resolves without any network round
//! trip; only the transfer itself touches the network.

use crate::backend::RemoteModInformation;
use crate::error::{ModsyncError, Result};

/// Resolve the information for a raw download URL
pub fn query(url: &str, file_name: Option<&str>) -> Result<RemoteModInformation> {
    let target_filename = match file_name {
        Some(name) => name.to_string(),
        None => filename_from_url(url).ok_or_else(|| ModsyncError::QueryFailed {
            name: url.to_string(),
            backend: "URL".to_string(),
            reason: "cannot derive a filename from the URL; add an explicit fileName".to_string(),
        })?,
    };

    Ok(RemoteModInformation {
        display_name: target_filename.clone(),
        target_filename,
        download_url: Some(url.to_string()),
    })
}

/// Last non-empty path segment of the URL, query string stripped
fn filename_from_url(url: &str) -> Option<String> {
    let without_fragment = url.split('#').next().unwrap_or(url);
    let without_query = without_fragment.split('?').next().unwrap_or(without_fragment);
    let after_scheme = without_query
        .split_once("://")
        .map_or(without_query, |(_, rest)| rest);

    after_scheme
        .split('/')
        .skip(1)
        .filter(|segment| !segment.is_empty())
        .last()
        .map(ToString::to_string)
}
