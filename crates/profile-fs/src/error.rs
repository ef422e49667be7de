//! Error types for profile-fs

use std::path::PathBuf;

/// Result type for profile-fs operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in profile-fs operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Destination directory missing: {path}")]
    DirectoryMissing { path: PathBuf },

    #[error("Source file missing: {path}")]
    SourceMissing { path: PathBuf },

    #[error("Directory {path} is not empty; refusing to remove it")]
    DirectoryNotEmpty { path: PathBuf },

    #[error("Lock acquisition failed for {path}")]
    LockFailed { path: PathBuf },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
