//! Modsync - declarative mod installation reconciler
//!
//! Reads a directory of mod descriptor files, classifies every declared mod
//! against the installation directory, installs or re-downloads what is
//! needed, and removes previously installed files that are no longer
//! declared.

use clap::Parser;

mod backend;
mod cli;
mod commands;
mod config;
mod error;
mod hash;
mod install;
mod paths;
mod pool;
mod progress;
mod tracker;

use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Sync(args) => commands::sync::run(args),
        Commands::Status(args) => commands::status::run(args),
        Commands::Version => commands::version::run(),
        Commands::Completions(args) => commands::completions::run(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
