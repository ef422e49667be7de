//! Error types for profile-monitor

/// Result type for supervisor operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when starting supervision.
///
/// Pipeline launch failures are not represented here: they happen on the
/// supervisor thread after `spawn` has returned and end the thread cleanly.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Failed to spawn supervisor thread: {source}")]
    ThreadSpawn {
        #[source]
        source: std::io::Error,
    },
}
