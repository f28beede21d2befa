//! Pre-install resolution stage
//!
//! Classifies every descriptor as excluded, fresh-install or reinstall.
//! Classification rules apply in a fixed order and earlier rules win:
//!
//! 1. side predicate declines
//! 2. remote query fails (severity per policy)
//! 3. target path escapes the root (always fatal)
//! 4. disabled marker present or version gate fails
//! 5. hash check against the target or its patched variant pair
//! 6. forced redownload of an existing target
//! 7. existing target without hash metadata is left alone
//! 8. otherwise fresh install
//!
//! A non-excluded descriptor whose policy names a superseded file also
//! renames that file aside with the disabled suffix.

use parking_lot::Mutex;

use crate::backend::{self, RemoteModInformation};
use crate::config::ModDescriptor;
use crate::error::Result;
use crate::hash::HashResult;
use crate::install::InstallableMod;
use crate::install::context::{RunContext, Severity};
use crate::paths::{self, InstallLayout};
use crate::pool::WorkerPool;
use crate::progress::StageProgress;

/// The three disjoint outputs of the resolution stage, each ordered by
/// descriptor index
#[derive(Debug, Default)]
pub struct Resolution {
    pub excluded: Vec<usize>,
    pub fresh: Vec<InstallableMod>,
    pub reinstall: Vec<InstallableMod>,
}

enum Classification {
    Excluded,
    Fresh(InstallableMod),
    Reinstall(InstallableMod),
}

/// Run the resolution stage over every descriptor on the worker pool
pub fn resolve(
    descriptors: &[ModDescriptor],
    layout: &InstallLayout,
    ctx: &RunContext,
    pool: &WorkerPool,
    progress: &StageProgress,
) -> Resolution {
    let excluded = Mutex::new(Vec::new());
    let fresh = Mutex::new(Vec::new());
    let reinstall = Mutex::new(Vec::new());

    let tasks: Vec<Box<dyn FnOnce() + Send + '_>> = descriptors
        .iter()
        .enumerate()
        .map(|(id, descriptor)| {
            let (excluded, fresh, reinstall) = (&excluded, &fresh, &reinstall);
            Box::new(move || {
                match classify(id, descriptor, layout, ctx) {
                    Classification::Excluded => excluded.lock().push(id),
                    Classification::Fresh(item) => fresh.lock().push(item),
                    Classification::Reinstall(item) => reinstall.lock().push(item),
                }
                progress.item_done(&descriptor.offline_name());
            }) as Box<dyn FnOnce() + Send + '_>
        })
        .collect();

    pool.run_all(tasks);
    progress.finish();

    let mut resolution = Resolution {
        excluded: excluded.into_inner(),
        fresh: fresh.into_inner(),
        reinstall: reinstall.into_inner(),
    };
    resolution.excluded.sort_unstable();
    resolution.fresh.sort_by_key(|m| m.descriptor_id);
    resolution.reinstall.sort_by_key(|m| m.descriptor_id);
    resolution
}

fn classify(
    id: usize,
    descriptor: &ModDescriptor,
    layout: &InstallLayout,
    ctx: &RunContext,
) -> Classification {
    if !descriptor
        .metadata
        .as_ref()
        .is_none_or(|m| m.should_install(ctx.side))
    {
        return Classification::Excluded;
    }

    let information = match query_cached(id, descriptor, ctx) {
        Ok(information) => information,
        Err(e) => {
            ctx.add_error(ctx.severity_for(descriptor), e.to_string());
            return Classification::Excluded;
        }
    };

    let target = match layout.target_for(descriptor.folder.as_deref(), &information.target_filename)
    {
        Ok(target) => target,
        Err(e) => {
            // Path escapes are fatal no matter what the policy says
            ctx.add_error(Severity::Error, e.to_string());
            return Classification::Excluded;
        }
    };

    let classification = classify_against_disk(id, descriptor, information, target, ctx);

    if !matches!(classification, Classification::Excluded) {
        apply_supersession(descriptor, layout, ctx);
    }

    classification
}

fn classify_against_disk(
    id: usize,
    descriptor: &ModDescriptor,
    information: RemoteModInformation,
    target: std::path::PathBuf,
    ctx: &RunContext,
) -> Classification {
    if paths::disabled_marker(&target).exists() || !ctx.passes_version_gate(descriptor) {
        return Classification::Excluded;
    }

    let patched = paths::patched_variant(&target);
    let disabled = paths::disabled_variant(&target);
    let variant_pair_exists = patched.exists() && disabled.exists();

    let has_hash = descriptor.metadata.as_ref().is_some_and(|m| m.has_hash());
    let target_exists = target.exists();

    let item = InstallableMod {
        descriptor_id: id,
        information,
        target: target.clone(),
    };

    if has_hash && (target_exists || variant_pair_exists) {
        // An externally patched install keeps the original bytes in the
        // `.disabled` file, so that is what the hash is checked against.
        let check_path = if target_exists { &target } else { &disabled };
        let result = descriptor
            .metadata
            .as_ref()
            .map_or(HashResult::Unknown, |m| m.check_hashes(check_path));

        return match result {
            HashResult::Matched => Classification::Excluded,
            HashResult::Unmatched => {
                remove_stale_variants(&patched, &disabled, ctx);
                Classification::Reinstall(item)
            }
            // Silently overwriting an unverifiable existing file is unsafe
            HashResult::Unknown => Classification::Excluded,
        };
    }

    let download_always = descriptor
        .policy
        .as_ref()
        .is_some_and(|p| p.download_always);
    if download_always && target_exists {
        return Classification::Reinstall(item);
    }

    if target_exists {
        // Assume an externally managed file, do not overwrite
        return Classification::Excluded;
    }

    Classification::Fresh(item)
}

pub(crate) fn query_cached(
    id: usize,
    descriptor: &ModDescriptor,
    ctx: &RunContext,
) -> Result<RemoteModInformation> {
    if let Some(information) = ctx.cached_info(id) {
        return Ok(information);
    }

    let information = backend::query_information(descriptor)?;
    ctx.cache_info(id, information.clone());
    Ok(information)
}

fn remove_stale_variants(
    patched: &std::path::Path,
    disabled: &std::path::Path,
    ctx: &RunContext,
) {
    for stale in [patched, disabled] {
        if !stale.exists() {
            continue;
        }
        if let Err(e) = std::fs::remove_file(stale) {
            ctx.add_error(
                Severity::Warn,
                format!("failed to remove stale file {}: {}", stale.display(), e),
            );
        }
    }
}

fn apply_supersession(descriptor: &ModDescriptor, layout: &InstallLayout, ctx: &RunContext) {
    let Some(superseded) = descriptor
        .policy
        .as_ref()
        .and_then(|p| p.supersede.as_deref())
    else {
        return;
    };

    let old = match layout.target_for(descriptor.folder.as_deref(), superseded) {
        Ok(old) => old,
        Err(e) => {
            ctx.add_error(Severity::Warn, e.to_string());
            return;
        }
    };

    if !old.exists() {
        return;
    }

    let marker = paths::disabled_marker(&old);
    if let Err(e) = std::fs::rename(&old, &marker) {
        ctx.add_error(
            Severity::Warn,
            format!("failed to disable superseded file {}: {}", old.display(), e),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{InstallSide, PackConfig};
    use serde_json::json;
    use tempfile::TempDir;

    fn context() -> RunContext {
        let pack = PackConfig {
            pack_name: "test".to_string(),
            local_version: None,
            target_version: None,
            remote_version: None,
        };
        RunContext::new(&pack, InstallSide::Client, None)
    }

    fn url_descriptor(extra: serde_json::Value) -> ModDescriptor {
        let mut value = json!({"type": "url", "url": "https://example.com/mod.jar"});
        if let serde_json::Value::Object(map) = extra {
            value.as_object_mut().unwrap().extend(map);
        }
        serde_json::from_value(value).unwrap()
    }

    fn run_resolve(descriptors: &[ModDescriptor], root: &std::path::Path) -> Resolution {
        let layout = InstallLayout::open(root).unwrap();
        let ctx = context();
        let pool = WorkerPool::new(2).unwrap();
        let progress = StageProgress::hidden(descriptors.len() as u64);
        resolve(descriptors, &layout, &ctx, &pool, &progress)
    }

    #[test]
    fn test_missing_target_is_fresh_install() {
        let temp = TempDir::new().unwrap();
        let resolution = run_resolve(&[url_descriptor(json!({}))], temp.path());

        assert_eq!(resolution.fresh.len(), 1);
        assert!(resolution.reinstall.is_empty());
        assert!(resolution.excluded.is_empty());
        assert_eq!(
            resolution.fresh[0].target,
            dunce::canonicalize(temp.path()).unwrap().join("mods/mod.jar")
        );
    }

    #[test]
    fn test_matching_hash_is_excluded() {
        let temp = TempDir::new().unwrap();
        let mods = temp.path().join("mods");
        std::fs::create_dir_all(&mods).unwrap();
        let file = mods.join("mod.jar");
        std::fs::write(&file, "installed bytes").unwrap();
        let hash = crate::hash::hash_file(&file).unwrap();

        let descriptor = url_descriptor(json!({"metadata": {"hash": hash}}));
        let resolution = run_resolve(&[descriptor], temp.path());

        assert_eq!(resolution.excluded, vec![0]);
        assert!(resolution.fresh.is_empty());
        assert!(resolution.reinstall.is_empty());
    }

    #[test]
    fn test_mismatched_hash_is_reinstall() {
        let temp = TempDir::new().unwrap();
        let mods = temp.path().join("mods");
        std::fs::create_dir_all(&mods).unwrap();
        std::fs::write(mods.join("mod.jar"), "stale bytes").unwrap();

        let descriptor = url_descriptor(json!({
            "metadata": {"hash": format!("blake3:{}", "ab".repeat(32))}
        }));
        let resolution = run_resolve(&[descriptor], temp.path());

        assert_eq!(resolution.reinstall.len(), 1);
        assert!(resolution.fresh.is_empty());
    }

    #[test]
    fn test_existing_target_without_hash_is_excluded() {
        let temp = TempDir::new().unwrap();
        let mods = temp.path().join("mods");
        std::fs::create_dir_all(&mods).unwrap();
        std::fs::write(mods.join("mod.jar"), "whatever").unwrap();

        let resolution = run_resolve(&[url_descriptor(json!({}))], temp.path());
        assert_eq!(resolution.excluded, vec![0]);
    }

    #[test]
    fn test_download_always_forces_reinstall() {
        let temp = TempDir::new().unwrap();
        let mods = temp.path().join("mods");
        std::fs::create_dir_all(&mods).unwrap();
        std::fs::write(mods.join("mod.jar"), "whatever").unwrap();

        let descriptor = url_descriptor(json!({
            "installationPolicy": {"downloadAlways": true}
        }));
        let resolution = run_resolve(&[descriptor], temp.path());
        assert_eq!(resolution.reinstall.len(), 1);
    }

    #[test]
    fn test_disabled_marker_excludes() {
        let temp = TempDir::new().unwrap();
        let mods = temp.path().join("mods");
        std::fs::create_dir_all(&mods).unwrap();
        std::fs::write(mods.join("mod.jar.disabled-by-modsync"), "").unwrap();

        let resolution = run_resolve(&[url_descriptor(json!({}))], temp.path());
        assert_eq!(resolution.excluded, vec![0]);
    }

    #[test]
    fn test_wrong_side_excludes_without_touching_disk() {
        let temp = TempDir::new().unwrap();
        let descriptor = url_descriptor(json!({"metadata": {"side": "server"}}));

        let resolution = run_resolve(&[descriptor], temp.path());
        assert_eq!(resolution.excluded, vec![0]);
    }

    #[test]
    fn test_path_escape_is_fatal() {
        let temp = TempDir::new().unwrap();
        let descriptor = url_descriptor(json!({"folder": "../outside"}));

        let layout = InstallLayout::open(temp.path()).unwrap();
        let ctx = context();
        let pool = WorkerPool::new(1).unwrap();
        let progress = StageProgress::hidden(1);
        let resolution = resolve(&[descriptor], &layout, &ctx, &pool, &progress);

        assert_eq!(resolution.excluded, vec![0]);
        assert!(ctx.has_fatal());
    }

    #[test]
    fn test_supersession_renames_old_file() {
        let temp = TempDir::new().unwrap();
        let mods = temp.path().join("mods");
        std::fs::create_dir_all(&mods).unwrap();
        std::fs::write(mods.join("old-static.jar"), "legacy").unwrap();

        let descriptor = url_descriptor(json!({
            "installationPolicy": {"supersede": "old-static.jar"}
        }));
        let resolution = run_resolve(&[descriptor], temp.path());

        assert_eq!(resolution.fresh.len(), 1);
        assert!(!mods.join("old-static.jar").exists());
        assert!(mods.join("old-static.jar.disabled-by-modsync").exists());
    }

    #[test]
    fn test_patched_variant_pair_checks_disabled_original() {
        let temp = TempDir::new().unwrap();
        let mods = temp.path().join("mods");
        std::fs::create_dir_all(&mods).unwrap();
        // Patched install: target gone, original bytes preserved in .disabled
        std::fs::write(mods.join("mod-patched.jar"), "patched bytes").unwrap();
        let disabled = mods.join("mod.disabled");
        std::fs::write(&disabled, "original bytes").unwrap();
        let hash = crate::hash::hash_file(&disabled).unwrap();

        let descriptor = url_descriptor(json!({"metadata": {"hash": hash}}));
        let resolution = run_resolve(&[descriptor], temp.path());
        assert_eq!(resolution.excluded, vec![0]);

        // A hash mismatch removes both stale variants and reinstalls
        std::fs::write(&disabled, "tampered bytes").unwrap();
        let descriptor = url_descriptor(json!({
            "metadata": {"hash": format!("blake3:{}", "cd".repeat(32))}
        }));
        let resolution = run_resolve(&[descriptor], temp.path());
        assert_eq!(resolution.reinstall.len(), 1);
        assert!(!mods.join("mod-patched.jar").exists());
        assert!(!disabled.exists());
    }

    #[test]
    fn test_resolution_is_idempotent_for_matching_hash() {
        let temp = TempDir::new().unwrap();
        let mods = temp.path().join("mods");
        std::fs::create_dir_all(&mods).unwrap();
        let file = mods.join("mod.jar");
        std::fs::write(&file, "stable bytes").unwrap();
        let hash = crate::hash::hash_file(&file).unwrap();

        let descriptor = url_descriptor(json!({"metadata": {"hash": hash}}));
        let first = run_resolve(std::slice::from_ref(&descriptor), temp.path());
        let second = run_resolve(&[descriptor], temp.path());

        assert_eq!(first.excluded, second.excluded);
        assert!(second.fresh.is_empty() && second.reinstall.is_empty());
    }

    #[test]
    fn test_outputs_ordered_by_descriptor_index() {
        let temp = TempDir::new().unwrap();
        let descriptors: Vec<_> = (0..8)
            .map(|i| {
                url_descriptor(json!({
                    "url": format!("https://example.com/mod-{i}.jar")
                }))
            })
            .collect();

        let resolution = run_resolve(&descriptors, temp.path());
        let ids: Vec<_> = resolution.fresh.iter().map(|m| m.descriptor_id).collect();
        assert_eq!(ids, (0..8).collect::<Vec<_>>());
    }
}
