//! CLI definitions using clap derive API
//!
//! This module is organized into submodules for each command's argument types:
//! - sync: Sync command arguments
//! - status: Status command arguments
//! - completions: Completions command arguments

use clap::builder::{Styles, styling::AnsiColor};
use clap::{Parser, Subcommand};

pub mod completions;
pub mod status;
pub mod sync;

pub use completions::CompletionsArgs;
pub use status::StatusArgs;
pub use sync::SyncArgs;

/// Modsync - declarative mod installation reconciler
#[derive(Parser, Debug)]
#[command(
    name = "modsync",
    author,
    version,
    color = clap::ColorChoice::Always,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Reconciles declared remote mod files against a local installation",
    long_about = "Modsync reads a directory of mod descriptor files, determines per mod whether \
                  it is already correctly installed, needs a download or should be skipped, \
                  prompts for optional selections, and removes files it installed that are no \
                  longer declared.",
    after_help = "\x1b[1m\x1b[32mExamples:\x1b[0m\n   \
                  modsync sync                        \x1b[90m# Reconcile ./config against .\x1b[0m\n   \
                  modsync sync --root /srv/pack --yes \x1b[90m# Non-interactive server sync\x1b[0m\n   \
                  modsync sync --dry-run              \x1b[90m# Show planned work only\x1b[0m\n   \
                  modsync status                      \x1b[90m# Classify without installing\x1b[0m\n\n\
                  "
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Reconcile the declared mod set against the installation
    Sync(SyncArgs),

    /// Classify every declared mod without installing anything
    Status(StatusArgs),

    /// Show version information
    #[command(hide = true)]
    Version,

    /// Generate shell completions
    Completions(CompletionsArgs),
}
