//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// LibreWolf touch profile kit - install UI overrides and run the focus bridge
#[derive(Parser, Debug)]
#[command(name = "lwprofile")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Install or refresh the profile customizations
    ///
    /// Mirrors the template chrome tree, injects the search-engine database,
    /// and installs librewolf.overrides.cfg. Safe to re-run at any time.
    Apply {
        /// Directory holding the bundled template assets
        #[arg(long, default_value = "/usr/share/lwprofile", env = "LWPROFILE_ASSETS")]
        assets: PathBuf,
    },

    /// Apply, then run the focus-event bridge until interrupted
    Run {
        /// Directory holding the bundled template assets
        #[arg(long, default_value = "/usr/share/lwprofile", env = "LWPROFILE_ASSETS")]
        assets: PathBuf,
    },

    /// Remove the managed chrome directory (refuses if it is not empty)
    Clean,
}
