//! Installation directory layout and path conventions
//!
//! All on-disk state beyond the tracking file is encoded in filename
//! conventions: a sibling `<name>.disabled-by-modsync` marker disables a
//! file, and externally patched files appear as a `-patched.jar` /
//! `.disabled` pair next to the original name. External tooling relies on
//! these names, so they are part of the wire contract and must not change.

use std::path::{Path, PathBuf};

use crate::error::{ModsyncError, Result};

/// Marker suffix for files disabled by this tool
pub const DISABLED_SUFFIX: &str = ".disabled-by-modsync";

/// Subdirectory of the installation root holding managed mod files
pub const MODS_DIR: &str = "mods";

/// Resolved installation directory layout
#[derive(Debug, Clone)]
pub struct InstallLayout {
    root: PathBuf,
}

impl InstallLayout {
    /// Open a layout rooted at the given installation directory.
    ///
    /// The root must exist; it is canonicalized so that containment checks
    /// compare against a stable absolute path.
    pub fn open(root: &Path) -> Result<Self> {
        let root = dunce::canonicalize(root).map_err(|e| ModsyncError::IoError {
            message: format!(
                "failed to resolve installation root {}: {}",
                root.display(),
                e
            ),
        })?;
        Ok(Self { root })
    }

    /// The installation root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The managed mods directory
    pub fn mods_dir(&self) -> PathBuf {
        self.root.join(MODS_DIR)
    }

    /// Compute the absolute target path for a resolved filename.
    ///
    /// `folder` follows the descriptor convention: absent means the managed
    /// mods directory, `.` means the installation root itself, anything else
    /// is a subfolder of the root.
    ///
    /// Fails when the normalized result escapes the installation root, which
    /// indicates a path-escape attempt in the configuration. This is always
    /// an error regardless of the descriptor's failure policy.
    pub fn target_for(&self, folder: Option<&str>, filename: &str) -> Result<PathBuf> {
        let unresolved = match folder {
            None => self.mods_dir().join(filename),
            Some(".") => self.root.join(filename),
            Some(custom) => self.root.join(custom).join(filename),
        };

        let normalized = lexical_normalize(&unresolved);
        if !normalized.starts_with(&self.root) {
            return Err(ModsyncError::PathEscape {
                path: normalized.display().to_string(),
                root: self.root.display().to_string(),
            });
        }

        Ok(normalized)
    }
}

/// Normalize a path lexically, resolving `.` and `..` components without
/// touching the filesystem (the target usually does not exist yet).
pub fn lexical_normalize(path: &Path) -> PathBuf {
    use std::path::Component;

    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !normalized.pop() {
                    normalized.push(component.as_os_str());
                }
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

/// Sibling path marking the given file as disabled by this tool
pub fn disabled_marker(target: &Path) -> PathBuf {
    sibling_with_name(target, |name| format!("{name}{DISABLED_SUFFIX}"))
}

/// Sibling path an external patcher would use for the patched copy
pub fn patched_variant(target: &Path) -> PathBuf {
    sibling_with_name(target, |name| name.replace(".jar", "-patched.jar"))
}

/// Sibling path an external patcher would use for the disabled original
pub fn disabled_variant(target: &Path) -> PathBuf {
    sibling_with_name(target, |name| name.replace(".jar", ".disabled"))
}

fn sibling_with_name(target: &Path, rename: impl Fn(&str) -> String) -> PathBuf {
    let name = target
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    target.with_file_name(rename(&name))
}

/// Make a pack name or version safe for use as a state directory component.
///
/// Replaces every character outside `[A-Za-z0-9._-]` with an underscore.
pub fn sanitize_component(value: &str) -> String {
    value
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect()
}
