//! Remote mod descriptors: one declared remote-sourced file each

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::config::metadata::RemoteMetadata;
use crate::config::policy::InstallPolicy;

/// Backend-specific identity of a remote file.
///
/// A closed set of backends; each one knows how to resolve its display name
/// and final filename and how to transfer bytes (see `crate::backend`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase", rename_all_fields = "camelCase")]
pub enum RemoteSource {
    /// A file hosted on CurseForge, addressed by project and file id
    Curse { project_id: u32, file_id: u32 },

    /// A file hosted on Modrinth, addressed by project and version id
    Modrinth {
        project_id: String,
        version_id: String,
    },

    /// A raw download URL
    Url { url: String },
}

/// One declared desired file. Immutable once loaded.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModDescriptor {
    #[serde(flatten)]
    pub source: RemoteSource,

    /// Hash and conditional-install metadata
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<RemoteMetadata>,

    /// Installation behavior flags
    #[serde(
        rename = "installationPolicy",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub policy: Option<InstallPolicy>,

    /// Opaque options bag passed through to the installed result
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Map<String, Value>>,

    /// Target folder override: absent = mods folder, `.` = installation root
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder: Option<String>,

    /// Mark the installed result for injection by the host application
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inject: Option<bool>,

    /// Explicit filename override, bypassing the backend-resolved name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,

    /// Free-form comment, ignored by the tool
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl ModDescriptor {
    /// Name of the backend that resolves this descriptor
    pub fn remote_type(&self) -> &'static str {
        match &self.source {
            RemoteSource::Curse { .. } => "Curse",
            RemoteSource::Modrinth { .. } => "Modrinth",
            RemoteSource::Url { .. } => "URL",
        }
    }

    /// A name usable before any remote query has happened
    pub fn offline_name(&self) -> String {
        match &self.source {
            RemoteSource::Curse {
                project_id,
                file_id,
            } => format!("Project ID: {project_id}, File ID: {file_id}"),
            RemoteSource::Modrinth {
                project_id,
                version_id,
            } => format!("Project ID: {project_id}, Version ID: {version_id}"),
            RemoteSource::Url { url } => url.clone(),
        }
    }

    /// Whether a download or query failure for this descriptor is survivable.
    /// A missing policy always means the failure is fatal.
    pub fn continue_on_failure(&self) -> bool {
        self.policy
            .as_ref()
            .is_some_and(|p| p.continue_on_failed_download)
    }

    /// Group key from the policy, `None` when ungrouped
    pub fn group_key(&self) -> Option<&str> {
        self.policy.as_ref().and_then(InstallPolicy::group_key)
    }
}
