//! Default LibreWolf profile resolution
//!
//! Reads `~/.librewolf/profiles.ini` and resolves the active profile: the
//! `[Install…]` section's `Default=` entry takes priority, falling back to
//! whichever `[ProfileN]` section carries `Default=1`. Nothing is ever
//! created here; a missing base directory or ini file is the normal state
//! before the browser's first start.

mod error;
mod ini;

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

pub use error::{Error, Result};
use ini::{Section, parse_sections};

/// The resolved profile a run operates on.
///
/// Opaque to the convergence code beyond providing the profile root; never
/// mutated downstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileContext {
    /// Absolute path of the profile directory.
    pub root_path: PathBuf,
    /// The profile's `Name=` entry, for operator-facing output.
    pub display_name: String,
}

/// Resolve the default profile under `~/.librewolf`.
///
/// # Errors
///
/// [`Error::NotReady`] when the base directory or profiles.ini does not
/// exist yet, [`Error::NoDefaultProfile`] when the ini defines no default.
pub fn find_default_profile() -> Result<ProfileContext> {
    let home = dirs::home_dir().ok_or(Error::HomeNotFound)?;
    resolve_in(&home.join(".librewolf"))
}

/// Resolve the default profile under an explicit base directory.
pub fn resolve_in(base: &Path) -> Result<ProfileContext> {
    if !base.is_dir() {
        return Err(Error::NotReady {
            path: base.to_path_buf(),
        });
    }

    let ini_path = base.join("profiles.ini");
    let content = match fs::read_to_string(&ini_path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(Error::NotReady { path: ini_path });
        }
        Err(e) => return Err(Error::io(ini_path, e)),
    };

    let context = resolve_from_ini(&content, base)?;
    if !context.root_path.is_dir() {
        // The ini can outlive a deleted profile directory; report it but let
        // the caller decide what a missing profile means for it.
        warn!(
            path = %context.root_path.display(),
            "profiles.ini references a profile directory that does not exist"
        );
    }
    debug!(
        name = %context.display_name,
        path = %context.root_path.display(),
        "resolved default profile"
    );
    Ok(context)
}

fn resolve_from_ini(content: &str, base: &Path) -> Result<ProfileContext> {
    let sections = parse_sections(content);

    // [Install...] names the active profile's relative path; recover the
    // display name from the [ProfileN] section with the matching Path.
    for install in sections.iter().filter(|s| s.name.starts_with("Install")) {
        let Some(rel_path) = install.get("Default") else {
            continue;
        };
        if let Some(name) = profile_name_for_path(&sections, rel_path) {
            return Ok(ProfileContext {
                root_path: base.join(rel_path),
                display_name: name.to_string(),
            });
        }
    }

    // Older installs mark the active profile directly with Default=1.
    for profile in sections.iter().filter(|s| s.name.starts_with("Profile")) {
        if profile.get("Default") != Some("1") {
            continue;
        }
        if let (Some(rel_path), Some(name)) = (profile.get("Path"), profile.get("Name")) {
            return Ok(ProfileContext {
                root_path: base.join(rel_path),
                display_name: name.to_string(),
            });
        }
    }

    Err(Error::NoDefaultProfile)
}

fn profile_name_for_path<'a>(sections: &'a [Section], rel_path: &str) -> Option<&'a str> {
    sections
        .iter()
        .filter(|s| s.name.starts_with("Profile"))
        .find(|s| s.get("Path") == Some(rel_path))
        .and_then(|s| s.get("Name"))
}
