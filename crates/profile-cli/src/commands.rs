//! Command implementations

use std::path::Path;

use colored::Colorize;
use profile_discovery::ProfileContext;
use profile_fs::{inject, mirror};
use profile_monitor::PipelineMonitor;
use tracing::warn;

use crate::error::Result;

/// Canonical search-engine database shipped with the assets.
const SEARCH_DB_ASSET: &str = "3870112724rsegmnoittet-es.sqlite";
/// The consumer renames the database to `<opaque-id>` plus this suffix.
const SEARCH_DB_SUFFIX: &str = "rsegmnoittet-es.sqlite";
/// Profile-internal storage directory holding the database.
const SEARCH_DB_DIR: &str = "storage/permanent/chrome/idb";

const OVERRIDES_CFG: &str = "librewolf.overrides.cfg";

/// Converge every managed file for the default profile.
///
/// Each step degrades gracefully: a missing asset or a not-yet-created
/// destination is logged and the remaining steps still run. Only a missing
/// profile is fatal to the command.
pub fn cmd_apply(assets: &Path) -> Result<ProfileContext> {
    let profile = profile_discovery::find_default_profile()?;
    println!(
        "{} applying customizations for profile {}",
        "lwprofile".green().bold(),
        profile.display_name.cyan()
    );

    // Database first: injecting a known-good copy works around the consumer
    // rebuilding a broken one on first start (fx-autoconfig issue #79).
    let idb_dir = profile.root_path.join(SEARCH_DB_DIR);
    match inject::inject_singleton(&assets.join(SEARCH_DB_ASSET), &idb_dir, SEARCH_DB_SUFFIX) {
        Ok(outcome) => println!("  search-engine database: {outcome:?}"),
        Err(e) => warn!(error = %e, "search-engine database injection skipped"),
    }

    let chrome_root = profile.root_path.join("chrome");
    match mirror::synchronize(&assets.join("chrome"), &chrome_root) {
        Ok(stats) => println!(
            "  chrome tree: {} created, {} updated, {} removed, {} failed",
            stats.created,
            stats.updated,
            stats.removed_files + stats.removed_dirs,
            stats.failed
        ),
        Err(e) => warn!(error = %e, "chrome tree synchronization failed"),
    }

    // overrides.cfg lives next to the profile directory, not inside it
    if let Some(parent) = profile.root_path.parent() {
        match mirror::sync_file(&assets.join(OVERRIDES_CFG), &parent.join(OVERRIDES_CFG)) {
            Ok(outcome) => println!("  {OVERRIDES_CFG}: {outcome:?}"),
            Err(e) => warn!(error = %e, "overrides.cfg installation skipped"),
        }
    }

    Ok(profile)
}

/// Apply, then supervise the focus-event bridge until Ctrl-C.
pub fn cmd_run(assets: &Path) -> Result<()> {
    let profile = cmd_apply(assets)?;

    match PipelineMonitor::focus_monitor(&profile.root_path).spawn()? {
        Some(handle) => {
            println!(
                "{} focus monitor running, press Ctrl-C to stop",
                "lwprofile".green().bold()
            );
            wait_for_interrupt()?;
            println!("stopping focus monitor");
            handle.shutdown();
        }
        None => println!("profile not ready for monitoring; nothing to supervise"),
    }
    Ok(())
}

/// Remove the managed chrome root. Refuses when the directory still holds
/// content, so nothing user-created is silently deleted.
pub fn cmd_clean() -> Result<()> {
    let profile = profile_discovery::find_default_profile()?;
    mirror::remove_dest_root(&profile.root_path.join("chrome"))?;
    println!(
        "{} removed chrome directory for profile {}",
        "lwprofile".green().bold(),
        profile.display_name.cyan()
    );
    Ok(())
}

fn wait_for_interrupt() -> Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(tokio::signal::ctrl_c())?;
    Ok(())
}
