//! Per-descriptor installation policy

use serde::{Deserialize, Serialize};

/// Group key value meaning "always install, never grouped"
pub const UNGROUPED_KEY: &str = "$";

/// Behavior flags governing how a single descriptor is installed
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InstallPolicy {
    /// Treat a failed download as a warning instead of aborting the run
    pub continue_on_failed_download: bool,

    /// Optional-selection group key. Absent or `"$"` means always install;
    /// any other string names a mutually exclusive radio group.
    pub optional_key: Option<String>,

    /// Explicit default-selection state for selectable options
    pub selected_by_default: Option<bool>,

    /// Human-readable label shown in selection prompts
    pub name: Option<String>,

    /// Longer description shown in selection prompts
    pub description: Option<String>,

    /// Extract the downloaded archive after installation
    pub extract: bool,

    /// Delete the archive once extracted
    pub delete_after_extract: bool,

    /// Re-download the file on every run even when it already exists
    pub download_always: bool,

    /// Filename of an older static file this descriptor supersedes
    pub supersede: Option<String>,

    /// Version gate: install only when this equals the pack version
    pub pack_version: Option<String>,
}

impl InstallPolicy {
    /// The effective group key, with the `"$"` sentinel collapsed to `None`
    pub fn group_key(&self) -> Option<&str> {
        match self.optional_key.as_deref() {
            None | Some(UNGROUPED_KEY) => None,
            Some(key) => Some(key),
        }
    }

    /// Whether a selectable option built from this policy starts selected.
    ///
    /// Ungrouped options default to selected; grouped options default to
    /// unselected unless the policy states otherwise.
    pub fn is_selected_by_default(&self) -> bool {
        self.selected_by_default
            .unwrap_or_else(|| self.group_key().is_none())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_key_collapses_sentinel() {
        let mut policy = InstallPolicy::default();
        assert_eq!(policy.group_key(), None);

        policy.optional_key = Some(UNGROUPED_KEY.to_string());
        assert_eq!(policy.group_key(), None);

        policy.optional_key = Some("addon".to_string());
        assert_eq!(policy.group_key(), Some("addon"));
    }

    #[test]
    fn test_default_selection() {
        let mut policy = InstallPolicy::default();
        assert!(policy.is_selected_by_default());

        policy.optional_key = Some("addon".to_string());
        assert!(!policy.is_selected_by_default());

        policy.selected_by_default = Some(true);
        assert!(policy.is_selected_by_default());
    }

    #[test]
    fn test_deserialize_camel_case() {
        let policy: InstallPolicy = serde_json::from_str(
            r#"{
                "continueOnFailedDownload": true,
                "optionalKey": "shaders",
                "downloadAlways": true,
                "supersede": "old-shaders.jar",
                "packVersion": "1.2.0"
            }"#,
        )
        .unwrap();

        assert!(policy.continue_on_failed_download);
        assert!(policy.download_always);
        assert_eq!(policy.group_key(), Some("shaders"));
        assert_eq!(policy.supersede.as_deref(), Some("old-shaders.jar"));
        assert_eq!(policy.pack_version.as_deref(), Some("1.2.0"));
    }
}
