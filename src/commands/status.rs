//! Status command implementation
//!
//! Runs the resolution stage only and prints the classification of every
//! declared mod without installing, disabling or removing anything.

use console::Style;

use crate::cli::StatusArgs;
use crate::config;
use crate::error::{ModsyncError, Result};
use crate::install::context::{RunContext, Severity};
use crate::install::resolver;
use crate::paths::InstallLayout;
use crate::pool::WorkerPool;
use crate::progress::StageProgress;

/// Run the status command
pub fn run(args: StatusArgs) -> Result<()> {
    let config = config::load(&args.config)?;
    let layout = InstallLayout::open(&args.root)?;

    let ctx = RunContext::new(&config.pack, args.side, None);
    let pool = WorkerPool::new(args.jobs)?;
    let progress = StageProgress::hidden(config.mods.len() as u64);

    let resolution = resolver::resolve(&config.mods, &layout, &ctx, &pool, &progress);

    let mut rows: Vec<(usize, &str)> = Vec::with_capacity(config.mods.len());
    rows.extend(resolution.excluded.iter().map(|&id| (id, "up to date / skipped")));
    rows.extend(resolution.fresh.iter().map(|m| (m.descriptor_id, "install")));
    rows.extend(resolution.reinstall.iter().map(|m| (m.descriptor_id, "reinstall")));
    rows.sort_unstable_by_key(|&(id, _)| id);

    let label = Style::new().bold();
    println!("{} {}", label.apply_to("Pack:"), config.pack.pack_name);
    for (id, status) in rows {
        let descriptor = &config.mods[id];
        let name = descriptor
            .file_name
            .clone()
            .unwrap_or_else(|| descriptor.offline_name());
        println!("  {:<50} {}", name, style_for(status).apply_to(status));
    }

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

    if ctx.has_fatal() {
        return Err(ModsyncError::FatalRunErrors {
            count: ctx.fatal_count(),
        });
    }
    Ok(())
}

fn style_for(status: &str) -> Style {
    match status {
        "install" | "reinstall" => Style::new().bold().cyan(),
        _ => Style::new().green(),
    }
}
