//! Error types for profile discovery

use std::path::PathBuf;

/// Result type for discovery operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while resolving the default profile
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Normal first-run state: the browser has not created its profile yet.
    #[error("Profile store not ready: {path} does not exist")]
    NotReady { path: PathBuf },

    #[error("Could not determine the current user's home directory")]
    HomeNotFound,

    #[error("profiles.ini defines no default profile")]
    NoDefaultProfile,

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
