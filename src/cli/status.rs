use std::path::PathBuf;

use clap::Parser;

use crate::config::InstallSide;

/// Arguments for the status command
#[derive(Parser, Debug)]
pub struct StatusArgs {
    /// Directory holding pack.json and the mod descriptor files
    #[arg(long, short = 'c', default_value = "config", env = "MODSYNC_CONFIG")]
    pub config: PathBuf,

    /// Installation root directory
    #[arg(long, short = 'r', default_value = ".", env = "MODSYNC_ROOT")]
    pub root: PathBuf,

    /// Which side of the installation to classify for
    #[arg(long, value_enum, default_value_t = InstallSide::Client)]
    pub side: InstallSide,

    /// Worker count for the resolution stage (0 = default)
    #[arg(long, short = 'j', default_value_t = 0)]
    pub jobs: usize,
}

#[cfg(test)]
mod tests {
    use crate::cli::{Cli, Commands};
    use crate::config::InstallSide;
    use clap::Parser;

    #[test]
    fn test_status_with_side() {
        let cli = Cli::try_parse_from(["modsync", "status", "--side", "server"]).unwrap();
        match cli.command {
            Commands::Status(args) => assert_eq!(args.side, InstallSide::Server),
            _ => panic!("Expected Status command"),
        }
    }
}
