//! Error type for the CLI

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced to the operator
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Discovery(#[from] profile_discovery::Error),

    #[error(transparent)]
    Fs(#[from] profile_fs::Error),

    #[error(transparent)]
    Monitor(#[from] profile_monitor::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
