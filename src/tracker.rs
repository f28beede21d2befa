//! Persistent tracking of files installed by this tool
//!
//! The store is a flat set of basenames, persisted as JSON under a path
//! derived from pack identity: `<state-root>/<pack>/<target-version>/<side>/
//! installed-mods.json`. Keying by basename rather than full path means a
//! relocated installation directory does not orphan its tracking data, and
//! the identity-derived location keeps separate logical installations from
//! colliding.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::{InstallSide, PackConfig};
use crate::error::{ModsyncError, Result};
use crate::paths::sanitize_component;

/// Filename of the persisted tracking set
pub const TRACKING_FILE: &str = "installed-mods.json";

/// State directory under the user's home, overridable for tests via
/// `MODSYNC_STATE_DIR`
const STATE_DIR: &str = ".modsync-state";

#[derive(Debug, Default, Serialize, Deserialize)]
struct TrackingData {
    #[serde(rename = "installedFiles", default)]
    installed_files: BTreeSet<String>,
}

/// Durable record of filenames this tool has installed
#[derive(Debug)]
pub struct TrackingStore {
    path: PathBuf,
    data: TrackingData,
}

impl TrackingStore {
    /// Open the store for the given pack identity, loading any persisted set.
    ///
    /// A missing or unparsable tracking file yields an empty set rather than
    /// an error.
    pub fn open_for(pack: &PackConfig, side: InstallSide) -> Result<Self> {
        let path = tracking_file_location(pack, side)?;
        Ok(Self::open_at(path))
    }

    /// Open the store at an explicit file path
    pub fn open_at(path: PathBuf) -> Self {
        let data = std::fs::read_to_string(&path)
            .ok()
            .and_then(|content| serde_json::from_str(&content).ok())
            .unwrap_or_default();

        Self { path, data }
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Record a newly installed file by basename
    pub fn track_installed_file(&mut self, file: &Path) {
        if let Some(name) = basename(file) {
            self.data.installed_files.insert(name);
        }
    }

    /// Remove a file from tracking by basename
    pub fn untrack_file(&mut self, file: &Path) {
        if let Some(name) = basename(file) {
            self.data.installed_files.remove(&name);
        }
    }

    /// Whether the given basename is tracked
    pub fn is_tracked(&self, file_name: &str) -> bool {
        self.data.installed_files.contains(file_name)
    }

    /// Snapshot of every tracked basename
    pub fn tracked_files(&self) -> BTreeSet<String> {
        self.data.installed_files.clone()
    }

    /// Whether nothing is tracked yet (bootstrap signal for reconstruction)
    pub fn is_empty(&self) -> bool {
        self.data.installed_files.is_empty()
    }

    /// Persist the set, overwriting any previous contents
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ModsyncError::FileWriteFailed {
                path: parent.display().to_string(),
                reason: e.to_string(),
            })?;
        }

        let json = serde_json::to_string_pretty(&self.data).map_err(|e| {
            ModsyncError::FileWriteFailed {
                path: self.path.display().to_string(),
                reason: e.to_string(),
            }
        })?;

        std::fs::write(&self.path, json).map_err(|e| ModsyncError::FileWriteFailed {
            path: self.path.display().to_string(),
            reason: e.to_string(),
        })
    }
}

fn basename(file: &Path) -> Option<String> {
    file.file_name().map(|n| n.to_string_lossy().into_owned())
}

/// Derive the tracking file location from pack identity
fn tracking_file_location(pack: &PackConfig, side: InstallSide) -> Result<PathBuf> {
    let state_root = match std::env::var_os("MODSYNC_STATE_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => dirs::home_dir()
            .ok_or(ModsyncError::NoStateRoot)?
            .join(STATE_DIR),
    };

    let pack_name = sanitize_component(&pack.pack_name);
    let target_version = pack
        .target_version
        .as_deref()
        .map_or_else(|| "unknown".to_string(), sanitize_component);

    Ok(state_root
        .join(pack_name)
        .join(target_version)
        .join(side.to_string())
        .join(TRACKING_FILE))
}
