//! Singleton data-asset injection
//!
//! The consuming application persists the search-engine database under a
//! name it generates itself (an opaque identifier plus a fixed suffix), so
//! the on-disk name cannot be assumed. The injector discovers whatever
//! instance exists by suffix match and converges that file against the
//! bundled canonical copy. When no instance exists yet, the canonical file's
//! own base name is used.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::compare::files_identical;
use crate::error::{Error, Result};

/// Outcome of a singleton injection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InjectOutcome {
    /// No matching instance existed; the canonical file was installed fresh.
    Created,
    /// The existing instance differed and was replaced under its own name.
    Updated,
    /// The existing instance already matched the canonical file.
    Unchanged,
}

/// Converge the one managed file in `destination_dir` with `canonical_source`.
///
/// The managed destination path is the first directory entry whose name ends
/// with `name_suffix`; additional matches are ignored, never deleted. A
/// differing instance is replaced under its original resolved name — the
/// consumer owns the naming and renaming it would orphan the file.
///
/// # Errors
///
/// Returns [`Error::DirectoryMissing`] when `destination_dir` does not exist
/// (the caller logs and continues; the directory is created by the consumer,
/// not by us), [`Error::SourceMissing`] when the bundled asset is absent, and
/// [`Error::Io`] for scan/compare/delete/copy failures. All are non-fatal to
/// the caller.
pub fn inject_singleton(
    canonical_source: &Path,
    destination_dir: &Path,
    name_suffix: &str,
) -> Result<InjectOutcome> {
    if !destination_dir.is_dir() {
        return Err(Error::DirectoryMissing {
            path: destination_dir.to_path_buf(),
        });
    }
    if !canonical_source.is_file() {
        return Err(Error::SourceMissing {
            path: canonical_source.to_path_buf(),
        });
    }

    let managed = resolve_managed_path(canonical_source, destination_dir, name_suffix)?;

    if !managed.exists() {
        fs::copy(canonical_source, &managed).map_err(|e| Error::io(&managed, e))?;
        info!(path = %managed.display(), "installed data asset");
        return Ok(InjectOutcome::Created);
    }

    if files_identical(canonical_source, &managed).map_err(|e| Error::io(&managed, e))? {
        debug!(path = %managed.display(), "data asset already up to date");
        return Ok(InjectOutcome::Unchanged);
    }

    fs::remove_file(&managed).map_err(|e| Error::io(&managed, e))?;
    fs::copy(canonical_source, &managed).map_err(|e| Error::io(&managed, e))?;
    info!(path = %managed.display(), "replaced outdated data asset");
    Ok(InjectOutcome::Updated)
}

/// Resolve the one file this run treats as the managed instance.
///
/// First suffix match wins; directory iteration order is whatever the
/// filesystem yields. Falls back to the canonical file's base name when the
/// directory holds no match.
fn resolve_managed_path(
    canonical_source: &Path,
    destination_dir: &Path,
    name_suffix: &str,
) -> Result<PathBuf> {
    let entries = fs::read_dir(destination_dir).map_err(|e| Error::io(destination_dir, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| Error::io(destination_dir, e))?;
        if entry.file_name().to_string_lossy().ends_with(name_suffix) {
            return Ok(entry.path());
        }
    }

    let base_name = canonical_source
        .file_name()
        .ok_or_else(|| Error::SourceMissing {
            path: canonical_source.to_path_buf(),
        })?;
    debug!(
        dir = %destination_dir.display(),
        suffix = name_suffix,
        "no existing instance found, using canonical name"
    );
    Ok(destination_dir.join(base_name))
}
