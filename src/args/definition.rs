//! Command-line argument definition.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// lanprefill - Warm a LAN game cache with the apps you own
#[derive(Parser, Debug)]
#[command(name = "lanprefill")]
#[command(version)]
#[command(about = "Warm a LAN game cache with the apps you own", long_about = None)]
pub struct Args {
    /// Set the logging level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", global = true)]
    pub log_level: String,

    /// Verbose output: debug logging plus chunk counts while prefilling
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration directory (default: ~/.config/lanprefill)
    #[arg(long, global = true)]
    pub config_dir: Option<PathBuf>,

    /// Command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Subcommands.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Choose which owned apps to prefill, interactively
    SelectApps {
        /// Disable colored output
        #[arg(long)]
        no_color: bool,
    },
    /// Download the selected apps through the LAN cache
    Prefill {
        /// Prefill every owned app, ignoring the saved selection
        #[arg(long)]
        all: bool,
        /// Re-download apps that are already up to date
        #[arg(long)]
        force: bool,
        /// Extra app ids (comma-separated or space-separated)
        #[arg(long = "app", num_args = 1..)]
        apps: Vec<String>,
    },
    /// Forget which apps are up to date so the next run downloads everything
    ClearCache,
    /// Show the saved selection and whether each app is up to date
    Status,
}
