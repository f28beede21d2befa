//! Pack-level configuration (`pack.json`)

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ModsyncError, Result};

/// Identity and versioning of the pack this configuration belongs to
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackConfig {
    /// Stable pack name; keyed into the tracking-state path, so it must stay
    /// constant across pack updates and must not embed a version number
    pub pack_name: String,

    /// Version of this local copy of the pack
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_version: Option<String>,

    /// Version of the target runtime (e.g. the game version)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_version: Option<String>,

    /// URL whose first response line is the authoritative pack version
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_version: Option<String>,
}

impl PackConfig {
    /// Fallback configuration for packs that ship no `pack.json`
    pub fn default_pack() -> Self {
        Self {
            pack_name: "default".to_string(),
            local_version: None,
            target_version: None,
            remote_version: None,
        }
    }

    /// Load and validate a pack configuration file
    pub fn load(path: &Path) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).map_err(|e| ModsyncError::FileReadFailed {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;

        let config: Self =
            serde_json::from_str(&content).map_err(|e| ModsyncError::ConfigParseFailed {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;

        if contains_version_pattern(&config.pack_name) {
            return Err(ModsyncError::PackNameContainsVersion {
                name: config.pack_name,
            });
        }

        Ok(config)
    }
}

/// Detect an embedded version number like `1.20` or `v2.0.1` in a pack name.
///
/// Versions belong in the dedicated fields; a versioned pack name would give
/// every pack update its own tracking-state directory and orphan the old one.
fn contains_version_pattern(name: &str) -> bool {
    let bytes = name.as_bytes();
    bytes
        .windows(3)
        .any(|w| w[0].is_ascii_digit() && w[1] == b'.' && w[2].is_ascii_digit())
}
