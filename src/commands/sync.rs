//! Sync command implementation
//!
//! Drives one full orchestration run: load configuration, resolve every
//! descriptor concurrently, prompt for optional selections and orphan
//! removal, execute the final install list, then persist tracking. A fatal
//! error recorded in any stage halts the run after that stage completes.

use console::Style;
use inquire::{MultiSelect, Select};
use parking_lot::Mutex;

use crate::cli::SyncArgs;
use crate::config::{self, PackConfig};
use crate::error::{ModsyncError, Result};
use crate::install::context::{RunContext, Severity};
use crate::install::removal::{self, SelectableRemovalOption};
use crate::install::selector::InstallSelector;
use crate::install::{InstallableMod, executor, resolver};
use crate::paths::InstallLayout;
use crate::pool::WorkerPool;
use crate::progress::StageProgress;
use crate::tracker::TrackingStore;

/// Run the sync command
pub fn run(args: SyncArgs) -> Result<()> {
    let config = config::load(&args.config)?;
    let layout = InstallLayout::open(&args.root)?;

    let remote_version = fetch_remote_version(&config.pack);
    if let Some(message) = version_mismatch(remote_version.as_deref(), &config.pack) {
        eprintln!(
            "{} {}",
            Style::new().bold().yellow().apply_to("warning:"),
            message
        );
    }
    let ctx = RunContext::new(&config.pack, args.side, remote_version);
    let tracker = Mutex::new(TrackingStore::open_for(&config.pack, args.side)?);
    let pool = WorkerPool::new(args.jobs)?;

    let progress = StageProgress::new("Resolving", config.mods.len() as u64);
    let resolution = resolver::resolve(&config.mods, &layout, &ctx, &pool, &progress);
    let excluded_count = resolution.excluded.len();

    let mut selector = InstallSelector::accept(&config.mods, resolution);
    halt_if_fatal(&ctx)?;

    let mut orphans = removal::identify_orphans(&config.mods, &layout, &ctx, &tracker);
    if !orphans.is_empty() && !args.yes && !args.dry_run {
        confirm_removals(&mut orphans, &layout)?;
    }

    if selector.has_selectable_options() && !args.yes && !args.dry_run {
        prompt_selections(&mut selector)?;
    }

    let to_install = selector.compute_mods_to_install();
    let to_disable = selector.compute_disabled_mods();

    if args.dry_run {
        print_plan(&to_install, &to_disable, &orphans);
        return Ok(());
    }

    removal::remove_orphans(&orphans, &ctx, &tracker);

    let progress = StageProgress::new("Installing", to_install.len() as u64 + 1);
    executor::execute(
        &config.mods,
        &to_install,
        &to_disable,
        &ctx,
        &tracker,
        &pool,
        &progress,
    );

    if let Err(e) = tracker.lock().save() {
        ctx.add_error(Severity::Warn, e.to_string());
    }

    print_summary(&ctx, excluded_count, &to_install, &orphans);
    halt_if_fatal(&ctx)
}

fn halt_if_fatal(ctx: &RunContext) -> Result<()> {
    if !ctx.has_fatal() {
        return Ok(());
    }
    print_errors(ctx);
    Err(ModsyncError::FatalRunErrors {
        count: ctx.fatal_count(),
    })
}

/// Fetch the remote pack version when the pack names a version URL. The
/// version is the first line of the response body. Failures only disable
/// the remote side of version gating.
fn fetch_remote_version(pack: &PackConfig) -> Option<String> {
    let url = pack.remote_version.as_deref()?;

    let fetched = crate::backend::http_client()
        .ok()
        .and_then(|client| client.get(url).send().ok())
        .and_then(|response| response.error_for_status().ok())
        .and_then(|response| response.text().ok())
        .and_then(|body| body.lines().next().map(str::trim).map(String::from));

    if fetched.is_none() {
        eprintln!("Warning: could not fetch remote pack version from {url}");
    }
    fetched
}

/// Message alerting the user that the pack declaration is behind (or ahead
/// of) the published pack version. Informational only; gating still uses
/// the remote version.
fn version_mismatch(remote_version: Option<&str>, pack: &PackConfig) -> Option<String> {
    let remote = remote_version?;
    let local = pack.local_version.as_deref()?;
    if remote == local {
        return None;
    }
    Some(format!(
        "pack '{}' is version {local} locally but {remote} remotely; \
         an update of the configuration may be available",
        pack.pack_name
    ))
}

fn confirm_removals(
    orphans: &mut [SelectableRemovalOption],
    layout: &InstallLayout,
) -> Result<()> {
    let labels: Vec<String> = orphans.iter().map(|o| o.label(layout)).collect();
    let defaults: Vec<usize> = (0..orphans.len()).collect();

    let chosen = MultiSelect::new(
        "These previously installed files are no longer declared. Remove:",
        labels,
    )
    .with_default(&defaults)
    .raw_prompt()?;

    for orphan in orphans.iter_mut() {
        orphan.selected = false;
    }
    for option in chosen {
        orphans[option.index].selected = true;
    }
    Ok(())
}

fn prompt_selections(selector: &mut InstallSelector) -> Result<()> {
    let singles = selector.single_options_mut();
    if !singles.is_empty() {
        let labels: Vec<String> = singles.iter().map(|o| o.label()).collect();
        let defaults: Vec<usize> = singles
            .iter()
            .enumerate()
            .filter(|(_, o)| o.selected)
            .map(|(i, _)| i)
            .collect();

        let chosen = MultiSelect::new("Select optional mods to install:", labels)
            .with_default(&defaults)
            .raw_prompt()?;

        for option in singles.iter_mut() {
            option.selected = false;
        }
        for option in chosen {
            singles[option.index].selected = true;
        }
    }

    for (key, options) in selector.groups_mut() {
        let labels: Vec<String> = options.iter().map(|o| o.label()).collect();
        let default = options.iter().position(|o| o.selected).unwrap_or(0);

        let chosen = Select::new(&format!("Select one option for '{key}':"), labels)
            .with_starting_cursor(default)
            .raw_prompt()?;

        for (i, option) in options.iter_mut().enumerate() {
            option.selected = i == chosen.index;
        }
    }

    Ok(())
}

fn print_plan(
    to_install: &[InstallableMod],
    to_disable: &[InstallableMod],
    orphans: &[SelectableRemovalOption],
) {
    let heading = Style::new().bold();

    println!("{}", heading.apply_to("Would install:"));
    for item in to_install {
        println!("  {} -> {}", item.information.display_name, item.target.display());
    }
    if to_install.is_empty() {
        println!("  (nothing)");
    }

    if !to_disable.is_empty() {
        println!("{}", heading.apply_to("Would mark disabled:"));
        for item in to_disable {
            println!("  {}", item.information.display_name);
        }
    }

    if !orphans.is_empty() {
        println!("{}", heading.apply_to("Would offer for removal:"));
        for orphan in orphans {
            println!("  {}", orphan.path.display());
        }
    }
}

fn print_errors(ctx: &RunContext) {
    for error in ctx.errors() {
        match error.severity {
            Severity::Error => eprintln!(
                "{} {}",
                Style::new().bold().red().apply_to("error:"),
                error.message
            ),
            Severity::Warn => eprintln!(
                "{} {}",
                Style::new().bold().yellow().apply_to("warning:"),
                error.message
            ),
        }
    }
}

fn print_summary(
    ctx: &RunContext,
    excluded_count: usize,
    to_install: &[InstallableMod],
    orphans: &[SelectableRemovalOption],
) {
    print_errors(ctx);

    let results = ctx.installed();
    for result in &results {
        let mut line = format!("  installed {}", result.path.display());
        if result.inject {
            line.push_str(" (inject)");
        }
        println!("{line}");
    }

    let installed = results.len();
    let removed = orphans.iter().filter(|o| o.selected).count();
    let failed = to_install.len().saturating_sub(installed);

    let ok = Style::new().bold().green();
    println!(
        "{} {} installed, {} up to date or skipped, {} removed, {} failed",
        ok.apply_to("Sync complete:"),
        installed,
        excluded_count,
        removed,
        failed
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pack(local: Option<&str>) -> PackConfig {
        PackConfig {
            pack_name: "Biggess Pack".to_string(),
            local_version: local.map(String::from),
            target_version: None,
            remote_version: None,
        }
    }

    #[test]
    fn test_version_mismatch_warns_on_disagreement() {
        let message = version_mismatch(Some("V1.1.0"), &pack(Some("V1.0.9"))).unwrap();
        assert!(message.contains("V1.0.9"));
        assert!(message.contains("V1.1.0"));
        assert!(message.contains("Biggess Pack"));
    }

    #[test]
    fn test_version_mismatch_silent_when_equal_or_unknown() {
        assert!(version_mismatch(Some("V1.0.9"), &pack(Some("V1.0.9"))).is_none());
        assert!(version_mismatch(None, &pack(Some("V1.0.9"))).is_none());
        assert!(version_mismatch(Some("V1.1.0"), &pack(None)).is_none());
    }
}
