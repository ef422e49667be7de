//! Mirror synchronization of the bundled template tree into a profile
//!
//! Makes the destination tree's managed content exactly match the source
//! tree: missing files are copied, differing files are replaced, files whose
//! relative path no longer appears under the source are deleted, and
//! directories absent from the source are removed once empty. The pass is
//! idempotent; re-running it over an unchanged source performs no writes.
//!
//! A single entry failing to copy, compare, or delete never aborts the pass.
//! The failure is logged, counted, and the remaining entries are still
//! converged. Only a destination root that cannot be created, or a source
//! root that cannot be enumerated at all, fails the whole call.

use std::fs::{self, DirEntry};
use std::path::Path;

use tracing::{debug, info, warn};

use crate::compare::files_identical;
use crate::error::{Error, Result};

/// Counters for one convergence pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SyncStats {
    /// Files copied because the destination had no counterpart.
    pub created: usize,
    /// Files replaced because their content differed.
    pub updated: usize,
    /// Destination files deleted because the source no longer has them.
    pub removed_files: usize,
    /// Empty destination directories removed.
    pub removed_dirs: usize,
    /// Entries skipped after an I/O failure.
    pub failed: usize,
}

impl SyncStats {
    /// True when the pass performed no filesystem mutation.
    pub fn is_noop(&self) -> bool {
        self.created == 0
            && self.updated == 0
            && self.removed_files == 0
            && self.removed_dirs == 0
    }
}

/// Outcome of a single-file convergence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileSyncOutcome {
    Created,
    Updated,
    Unchanged,
}

/// Converge `destination_root` to exactly match `source_root`.
///
/// A missing source tree is a logged no-op, not an error: on first boot the
/// template may not be installed yet and the next run converges normally.
///
/// # Errors
///
/// Fails only if `destination_root` cannot be created or `source_root`
/// cannot be enumerated. Per-entry failures are counted in
/// [`SyncStats::failed`] instead.
pub fn synchronize(source_root: &Path, destination_root: &Path) -> Result<SyncStats> {
    let mut stats = SyncStats::default();

    if !source_root.is_dir() {
        warn!(
            source = %source_root.display(),
            "source tree missing, nothing to synchronize"
        );
        return Ok(stats);
    }

    fs::create_dir_all(destination_root).map_err(|e| Error::io(destination_root, e))?;

    let entries = fs::read_dir(source_root).map_err(|e| Error::io(source_root, e))?;
    for entry in entries {
        match entry {
            Ok(entry) => copy_entry(&entry, destination_root, &mut stats),
            Err(e) => {
                warn!(source = %source_root.display(), error = %e, "unreadable source entry");
                stats.failed += 1;
            }
        }
    }

    prune_dir(source_root, destination_root, &mut stats);

    info!(
        created = stats.created,
        updated = stats.updated,
        removed_files = stats.removed_files,
        removed_dirs = stats.removed_dirs,
        failed = stats.failed,
        destination = %destination_root.display(),
        "mirror pass complete"
    );
    Ok(stats)
}

/// Copy one source entry (file or directory subtree) into `dest_dir`.
fn copy_entry(entry: &DirEntry, dest_dir: &Path, stats: &mut SyncStats) {
    let source_path = entry.path();
    let dest_path = dest_dir.join(entry.file_name());

    let file_type = match entry.file_type() {
        Ok(t) => t,
        Err(e) => {
            warn!(path = %source_path.display(), error = %e, "cannot stat source entry");
            stats.failed += 1;
            return;
        }
    };

    if file_type.is_dir() {
        if !dest_path.is_dir() {
            debug!(path = %dest_path.display(), "creating directory");
            if let Err(e) = fs::create_dir_all(&dest_path) {
                warn!(
                    path = %dest_path.display(),
                    error = %e,
                    "cannot create destination directory, skipping subtree"
                );
                stats.failed += 1;
                return;
            }
        }
        let entries = match fs::read_dir(&source_path) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(path = %source_path.display(), error = %e, "cannot read source directory");
                stats.failed += 1;
                return;
            }
        };
        for child in entries {
            match child {
                Ok(child) => copy_entry(&child, &dest_path, stats),
                Err(e) => {
                    warn!(path = %source_path.display(), error = %e, "unreadable source entry");
                    stats.failed += 1;
                }
            }
        }
    } else {
        converge_file(&source_path, &dest_path, stats);
    }
}

/// Bring a single destination file up to date with its source counterpart.
fn converge_file(source_file: &Path, dest_file: &Path, stats: &mut SyncStats) {
    if !dest_file.exists() {
        match fs::copy(source_file, dest_file) {
            Ok(_) => {
                debug!(path = %dest_file.display(), "copied new file");
                stats.created += 1;
            }
            Err(e) => {
                warn!(path = %dest_file.display(), error = %e, "copy failed");
                stats.failed += 1;
            }
        }
        return;
    }

    // A failed comparison is treated as a difference: overwriting with known
    // good content is safer than keeping a file we cannot read.
    let differs = match files_identical(source_file, dest_file) {
        Ok(identical) => !identical,
        Err(e) => {
            warn!(path = %dest_file.display(), error = %e, "comparison failed, replacing");
            true
        }
    };
    if !differs {
        return;
    }

    // Remove-then-copy: a direct overwrite could leave partial bytes behind
    // if the copy dies midway.
    if let Err(e) = fs::remove_file(dest_file) {
        warn!(path = %dest_file.display(), error = %e, "cannot remove outdated file");
        stats.failed += 1;
        return;
    }
    match fs::copy(source_file, dest_file) {
        Ok(_) => {
            debug!(path = %dest_file.display(), "replaced outdated file");
            stats.updated += 1;
        }
        Err(e) => {
            warn!(path = %dest_file.display(), error = %e, "copy failed");
            stats.failed += 1;
        }
    }
}

/// Remove managed destination entries with no source counterpart.
///
/// Walks depth first. Files are deleted only inside directories that exist
/// under the source; a directory absent from the source is removed when
/// empty and otherwise left completely untouched, so user-created content
/// living inside the managed root is never destroyed.
fn prune_dir(source_dir: &Path, dest_dir: &Path, stats: &mut SyncStats) {
    let entries = match fs::read_dir(dest_dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!(path = %dest_dir.display(), error = %e, "cannot read destination directory");
            stats.failed += 1;
            return;
        }
    };

    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(path = %dest_dir.display(), error = %e, "unreadable destination entry");
                stats.failed += 1;
                continue;
            }
        };
        let dest_path = entry.path();
        let source_path = source_dir.join(entry.file_name());

        let file_type = match entry.file_type() {
            Ok(t) => t,
            Err(e) => {
                warn!(path = %dest_path.display(), error = %e, "cannot stat destination entry");
                stats.failed += 1;
                continue;
            }
        };

        if file_type.is_dir() {
            if source_path.is_dir() {
                prune_dir(&source_path, &dest_path, stats);
            } else {
                remove_if_empty(&dest_path, stats);
            }
        } else if !source_path.exists() {
            match fs::remove_file(&dest_path) {
                Ok(()) => {
                    info!(path = %dest_path.display(), "deleted extraneous file");
                    stats.removed_files += 1;
                }
                Err(e) => {
                    warn!(path = %dest_path.display(), error = %e, "cannot delete extraneous file");
                    stats.failed += 1;
                }
            }
        }
    }
}

/// Remove a directory absent from the source, but never a non-empty one.
fn remove_if_empty(dest_path: &Path, stats: &mut SyncStats) {
    match dir_is_empty(dest_path) {
        Ok(true) => match fs::remove_dir(dest_path) {
            Ok(()) => {
                info!(path = %dest_path.display(), "removed extraneous empty directory");
                stats.removed_dirs += 1;
            }
            Err(e) => {
                warn!(path = %dest_path.display(), error = %e, "cannot remove directory");
                stats.failed += 1;
            }
        },
        Ok(false) => {
            debug!(path = %dest_path.display(), "leaving non-empty unmanaged directory");
        }
        Err(e) => {
            warn!(path = %dest_path.display(), error = %e, "cannot inspect directory");
            stats.failed += 1;
        }
    }
}

fn dir_is_empty(path: &Path) -> std::io::Result<bool> {
    Ok(fs::read_dir(path)?.next().is_none())
}

/// Converge a single fixed-name destination file with its source.
///
/// Used for `librewolf.overrides.cfg`, which lives next to the profile
/// directory rather than inside the managed tree.
///
/// # Errors
///
/// Returns [`Error::SourceMissing`] when the source file is absent,
/// [`Error::DirectoryMissing`] when the destination's parent directory does
/// not exist, and [`Error::Io`] for compare/delete/copy failures.
pub fn sync_file(source: &Path, destination: &Path) -> Result<FileSyncOutcome> {
    if !source.is_file() {
        return Err(Error::SourceMissing {
            path: source.to_path_buf(),
        });
    }
    if let Some(parent) = destination.parent() {
        if !parent.is_dir() {
            return Err(Error::DirectoryMissing {
                path: parent.to_path_buf(),
            });
        }
    }

    if !destination.exists() {
        fs::copy(source, destination).map_err(|e| Error::io(destination, e))?;
        debug!(path = %destination.display(), "installed file");
        return Ok(FileSyncOutcome::Created);
    }

    if files_identical(source, destination).map_err(|e| Error::io(destination, e))? {
        return Ok(FileSyncOutcome::Unchanged);
    }

    fs::remove_file(destination).map_err(|e| Error::io(destination, e))?;
    fs::copy(source, destination).map_err(|e| Error::io(destination, e))?;
    debug!(path = %destination.display(), "replaced outdated file");
    Ok(FileSyncOutcome::Updated)
}

/// Remove the managed destination root as part of a clean uninstall.
///
/// Succeeds only when the directory is already empty; a populated directory
/// is reported and left in place so user content is never silently deleted.
/// An absent directory is a logged no-op.
pub fn remove_dest_root(destination_root: &Path) -> Result<()> {
    if !destination_root.exists() {
        warn!(
            path = %destination_root.display(),
            "destination root does not exist, nothing to remove"
        );
        return Ok(());
    }

    fs::remove_dir(destination_root).map_err(|e| {
        if e.kind() == std::io::ErrorKind::DirectoryNotEmpty {
            Error::DirectoryNotEmpty {
                path: destination_root.to_path_buf(),
            }
        } else {
            Error::io(destination_root, e)
        }
    })?;
    info!(path = %destination_root.display(), "removed destination root");
    Ok(())
}
