//! LibreWolf touch profile kit CLI
//!
//! Orchestrates the library crates: resolves the default profile, converges
//! the managed files, and supervises the focus-event bridge. Every apply
//! step is non-fatal on its own; failures are logged and the remaining
//! steps still run.

mod cli;
mod commands;
mod error;

use clap::Parser;
use colored::Colorize;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use cli::{Cli, Commands};
use error::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    // Setup tracing if verbose
    if cli.verbose {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::DEBUG)
            .with_target(true)
            .finish();
        tracing::subscriber::set_global_default(subscriber)
            .expect("Failed to set tracing subscriber");
        tracing::debug!("Verbose mode enabled");
    }

    match cli.command {
        Commands::Apply { assets } => commands::cmd_apply(&assets).map(|_| ()),
        Commands::Run { assets } => commands::cmd_run(&assets),
        Commands::Clean => commands::cmd_clean(),
    }
}
