//! Descriptor metadata: hash verification and conditional installation

use std::fmt;
use std::path::Path;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::hash::{self, HashResult};

/// Which side of the installation this run manages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum InstallSide {
    Client,
    Server,
}

impl fmt::Display for InstallSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InstallSide::Client => write!(f, "client"),
            InstallSide::Server => write!(f, "server"),
        }
    }
}

/// Optional verification and gating metadata carried by a descriptor
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RemoteMetadata {
    /// Expected content hash of the installed file (`blake3:<hex>`)
    pub hash: Option<String>,

    /// Restrict installation to one side; absent means both sides
    pub side: Option<InstallSide>,
}

impl RemoteMetadata {
    /// Conditional-install predicate: should this descriptor be installed at
    /// all for the given side?
    pub fn should_install(&self, side: InstallSide) -> bool {
        self.side.is_none_or(|required| required == side)
    }

    /// Whether hash verification is possible for this descriptor
    pub fn has_hash(&self) -> bool {
        self.hash.is_some()
    }

    /// Compare the file at `path` against the expected hash
    pub fn check_hashes(&self, path: &Path) -> HashResult {
        hash::check_file(path, self.hash.as_deref())
    }
}
