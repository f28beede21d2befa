//! Orphan detection and removal
//!
//! Compares the tracking store against the set of filenames the current
//! declaration would produce. Tracked names with no current counterpart are
//! orphans: if a matching file is found on disk it is offered for removal,
//! otherwise the stale tracking entry is dropped quietly. Removal itself
//! only happens after the command layer has confirmed the selection.

use std::collections::BTreeSet;
use std::path::PathBuf;

use parking_lot::Mutex;

use crate::config::ModDescriptor;
use crate::install::context::{RunContext, Severity};
use crate::install::resolver::query_cached;
use crate::paths::{self, InstallLayout};
use crate::tracker::TrackingStore;

/// A tracked file no longer produced by any declared descriptor
#[derive(Debug, Clone)]
pub struct SelectableRemovalOption {
    pub path: PathBuf,
    pub selected: bool,
}

impl SelectableRemovalOption {
    /// Prompt label: the path relative to the installation root when possible
    pub fn label(&self, layout: &InstallLayout) -> String {
        self.path
            .strip_prefix(layout.root())
            .unwrap_or(&self.path)
            .display()
            .to_string()
    }
}

/// Find every orphaned file, migrating existing declared files into the
/// tracking set first.
///
/// Migration gives retroactive compatibility for installations that predate
/// tracking: every declared target, disabled marker or patched variant that
/// already exists on disk is marked tracked, without any download. Once its
/// descriptor is dropped, such a file becomes an orphan like any other.
pub fn identify_orphans(
    descriptors: &[ModDescriptor],
    layout: &InstallLayout,
    ctx: &RunContext,
    tracker: &Mutex<TrackingStore>,
) -> Vec<SelectableRemovalOption> {
    let expected = expected_file_names(descriptors, layout, ctx);

    migrate_existing_files(descriptors, layout, ctx, tracker);

    let tracked = tracker.lock().tracked_files();
    let mut orphans = Vec::new();

    for file_name in tracked {
        if expected.contains(&file_name) {
            continue;
        }

        // Search the managed folder first, then the installation root
        let candidates = [layout.mods_dir().join(&file_name), layout.root().join(&file_name)];
        match candidates.into_iter().find(|p| p.exists()) {
            Some(path) => orphans.push(SelectableRemovalOption {
                path,
                selected: true,
            }),
            // Stale entry: the file is already gone
            None => tracker.lock().untrack_file(std::path::Path::new(&file_name)),
        }
    }

    orphans
}

/// Delete every confirmed orphan and drop it from tracking. Deletion
/// failures are warnings; the entry stays tracked for the next run.
pub fn remove_orphans(
    confirmed: &[SelectableRemovalOption],
    ctx: &RunContext,
    tracker: &Mutex<TrackingStore>,
) {
    for orphan in confirmed {
        if !orphan.selected {
            continue;
        }
        match std::fs::remove_file(&orphan.path) {
            Ok(()) => tracker.lock().untrack_file(&orphan.path),
            Err(e) => ctx.add_error(
                Severity::Warn,
                format!("failed to remove {}: {}", orphan.path.display(), e),
            ),
        }
    }
}

/// Every basename the current declaration could legitimately leave on disk
fn expected_file_names(
    descriptors: &[ModDescriptor],
    layout: &InstallLayout,
    ctx: &RunContext,
) -> BTreeSet<String> {
    let mut expected = BTreeSet::new();

    for (id, descriptor) in descriptors.iter().enumerate() {
        let Ok(information) = query_cached(id, descriptor, ctx) else {
            // Query failures were already recorded during resolution
            continue;
        };
        let Ok(target) = layout.target_for(descriptor.folder.as_deref(), &information.target_filename)
        else {
            continue;
        };

        for variant in [
            target.clone(),
            paths::disabled_marker(&target),
            paths::patched_variant(&target),
            paths::disabled_variant(&target),
        ] {
            if let Some(name) = variant.file_name() {
                expected.insert(name.to_string_lossy().into_owned());
            }
        }
    }

    expected
}

fn migrate_existing_files(
    descriptors: &[ModDescriptor],
    layout: &InstallLayout,
    ctx: &RunContext,
    tracker: &Mutex<TrackingStore>,
) {
    for (id, descriptor) in descriptors.iter().enumerate() {
        let Ok(information) = query_cached(id, descriptor, ctx) else {
            continue;
        };
        let Ok(target) = layout.target_for(descriptor.folder.as_deref(), &information.target_filename)
        else {
            continue;
        };

        for variant in [
            target.clone(),
            paths::disabled_marker(&target),
            paths::patched_variant(&target),
            paths::disabled_variant(&target),
        ] {
            if variant.exists() {
                tracker.lock().track_installed_file(&variant);
            }
        }
    }
}
