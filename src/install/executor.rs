//! Install execution stage
//!
//! Runs the final install list on the worker pool: parent directory
//! creation, byte transfer through the descriptor's backend, post-download
//! hash verification, then result and tracking bookkeeping. A trailing
//! synthetic task writes disabled markers for every option the user
//! rejected, so those are not offered again next run.

use parking_lot::Mutex;

use crate::backend;
use crate::config::ModDescriptor;
use crate::error::{ModsyncError, Result};
use crate::hash::HashResult;
use crate::install::InstallableMod;
use crate::install::context::{InstalledMod, RunContext, Severity};
use crate::paths;
use crate::pool::WorkerPool;
use crate::progress::StageProgress;
use crate::tracker::TrackingStore;

/// Run the execution stage: install every selected item and write disabled
/// markers for every rejected one
pub fn execute(
    descriptors: &[ModDescriptor],
    to_install: &[InstallableMod],
    to_disable: &[InstallableMod],
    ctx: &RunContext,
    tracker: &Mutex<TrackingStore>,
    pool: &WorkerPool,
    progress: &StageProgress,
) {
    let mut tasks: Vec<Box<dyn FnOnce() + Send + '_>> = to_install
        .iter()
        .map(|item| {
            let descriptor = &descriptors[item.descriptor_id];
            Box::new(move || {
                match install_one(descriptor, item, progress) {
                    Ok(()) => {
                        record_success(descriptor, item, ctx, tracker);
                    }
                    Err(e @ ModsyncError::HashMismatch { .. })
                    | Err(e @ ModsyncError::FileWriteFailed { .. }) => {
                        // Corrupt or unwritable artifacts are never survivable
                        ctx.add_error(Severity::Error, e.to_string());
                    }
                    Err(e) => {
                        ctx.add_error(ctx.severity_for(descriptor), e.to_string());
                    }
                }
                progress.item_done(&item.information.display_name);
            }) as Box<dyn FnOnce() + Send + '_>
        })
        .collect();

    tasks.push(Box::new(move || {
        write_disabled_markers(to_disable, ctx);
        progress.item_done("disabled markers");
    }));

    pool.run_all(tasks);
    progress.finish();
}

fn install_one(
    descriptor: &ModDescriptor,
    item: &InstallableMod,
    progress: &StageProgress,
) -> Result<()> {
    if let Some(parent) = item.target.parent() {
        std::fs::create_dir_all(parent).map_err(|e| ModsyncError::FileWriteFailed {
            path: parent.display().to_string(),
            reason: e.to_string(),
        })?;
    }

    let sink = progress.transfer_sink();
    backend::perform_install(descriptor, &item.information, &item.target, &sink)?;
    drop(sink);

    verify_installed(descriptor, item)
}

/// Post-download integrity check. A mismatch here is always fatal, whatever
/// the descriptor's failure policy says.
fn verify_installed(descriptor: &ModDescriptor, item: &InstallableMod) -> Result<()> {
    let Some(metadata) = &descriptor.metadata else {
        return Ok(());
    };

    match metadata.check_hashes(&item.target) {
        HashResult::Unmatched => Err(ModsyncError::HashMismatch {
            path: item.target.display().to_string(),
        }),
        HashResult::Matched | HashResult::Unknown => Ok(()),
    }
}

fn record_success(
    descriptor: &ModDescriptor,
    item: &InstallableMod,
    ctx: &RunContext,
    tracker: &Mutex<TrackingStore>,
) {
    ctx.record_installed(InstalledMod {
        path: item.target.clone(),
        options: descriptor.options.clone(),
        inject: descriptor.inject.unwrap_or(false),
    });
    tracker.lock().track_installed_file(&item.target);
}

/// Write a disabled marker next to every rejected option's target. Failures
/// here only degrade the next run's prompts, so they are warnings.
fn write_disabled_markers(to_disable: &[InstallableMod], ctx: &RunContext) {
    for item in to_disable {
        let marker = paths::disabled_marker(&item.target);
        let result = marker
            .parent()
            .map_or(Ok(()), std::fs::create_dir_all)
            .and_then(|()| std::fs::write(&marker, []));

        if let Err(e) = result {
            ctx.add_error(
                Severity::Warn,
                format!(
                    "failed to write disabled marker {}: {}",
                    marker.display(),
                    e
                ),
            );
        }
    }
}
