//! CLI definitions for pixdex.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// pixdex CLI.
#[derive(Parser)]
#[command(name = "pixdex")]
#[command(about = "Manage the pixdex background indexer service")]
#[command(version)]
pub(crate) struct Cli {
    /// Configuration file path (default: ~/.pixdex/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Background indexer service commands
    Service {
        #[command(subcommand)]
        action: ServiceAction,
    },
}

#[derive(Subcommand)]
pub(crate) enum ServiceAction {
    /// Write the LaunchAgent plist and register the indexer
    Install,

    /// Unregister the indexer and remove its plist
    Uninstall,

    /// Unregister and re-register the installed plist
    Restart,

    /// Show whether the indexer is registered with launchd
    Status,

    /// Print the plist that install would write
    Print,

    /// Show the indexer's stdout/stderr logs
    Logs {
        /// Number of lines to show
        #[arg(long, default_value_t = 100)]
        lines: usize,
    },
}
