use std::path::PathBuf;

use clap::Parser;

use crate::config::InstallSide;

/// Arguments for the sync command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                   Reconcile a client installation:\n    modsync sync\n\n\
                   Reconcile a dedicated server:\n    modsync sync --side server --yes\n\n\
                   Preview without touching disk:\n    modsync sync --dry-run")]
pub struct SyncArgs {
    /// Directory holding pack.json and the mod descriptor files
    #[arg(long, short = 'c', default_value = "config", env = "MODSYNC_CONFIG")]
    pub config: PathBuf,

    /// Installation root directory
    #[arg(long, short = 'r', default_value = ".", env = "MODSYNC_ROOT")]
    pub root: PathBuf,

    /// Which side of the installation to manage
    #[arg(long, value_enum, default_value_t = InstallSide::Client)]
    pub side: InstallSide,

    /// Worker count for the resolution and install stages (0 = default)
    #[arg(long, short = 'j', default_value_t = 0)]
    pub jobs: usize,

    /// Accept every default selection and removal without prompting
    #[arg(long, short = 'y')]
    pub yes: bool,

    /// Show what would be installed and removed without doing it
    #[arg(long)]
    pub dry_run: bool,
}
