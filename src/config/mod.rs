//! Configuration loading for modsync
//!
//! A configuration directory contains an optional `pack.json` plus any number
//! of `*.json` descriptor files. Each descriptor file holds either a JSON
//! array of descriptors or a single descriptor object. Files are discovered
//! recursively and loaded in sorted path order so that descriptor indices are
//! stable between runs.

pub mod descriptor;
pub mod metadata;
pub mod pack;
pub mod policy;

use std::path::Path;

use walkdir::WalkDir;

pub use descriptor::{ModDescriptor, RemoteSource};
pub use metadata::InstallSide;
pub use pack::PackConfig;

use crate::error::{ModsyncError, Result};

/// Filename of the pack-level configuration inside the config directory
pub const PACK_FILE: &str = "pack.json";

/// The full declared configuration for one run
#[derive(Debug, Clone)]
pub struct ConfigSet {
    pub pack: PackConfig,
    pub mods: Vec<ModDescriptor>,
}

/// Load the pack configuration and every descriptor file under `config_dir`
pub fn load(config_dir: &Path) -> Result<ConfigSet> {
    if !config_dir.is_dir() {
        return Err(ModsyncError::ConfigDirNotFound {
            path: config_dir.display().to_string(),
        });
    }

    let pack_path = config_dir.join(PACK_FILE);
    let pack = if pack_path.is_file() {
        PackConfig::load(&pack_path)?
    } else {
        PackConfig::default_pack()
    };

    let mut descriptor_files: Vec<_> = WalkDir::new(config_dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| e.path().extension().is_some_and(|ext| ext == "json"))
        .filter(|e| e.file_name() != PACK_FILE)
        .map(|e| e.into_path())
        .collect();
    descriptor_files.sort();

    let mut mods = Vec::new();
    for path in descriptor_files {
        mods.extend(load_descriptor_file(&path)?);
    }

    Ok(ConfigSet { pack, mods })
}

fn load_descriptor_file(path: &Path) -> Result<Vec<ModDescriptor>> {
    let content = std::fs::read_to_string(path).map_err(|e| ModsyncError::FileReadFailed {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;

    // A file is either an array of descriptors or a single descriptor
    serde_json::from_str::<Vec<ModDescriptor>>(&content)
        .or_else(|_| serde_json::from_str::<ModDescriptor>(&content).map(|d| vec![d]))
        .map_err(|e| ModsyncError::ConfigParseFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
}
