//! Filesystem convergence for LibreWolf profile customization
//!
//! Provides content-compared mirroring of the bundled template tree into a
//! profile, wildcard-resolved injection of single data assets, and generation
//! of the CSS variable sheet the chrome overrides consume.

pub mod compare;
pub mod cssvars;
pub mod error;
pub mod inject;
pub mod io;
pub mod mirror;

pub use cssvars::CssValue;
pub use error::{Error, Result};
pub use inject::InjectOutcome;
pub use mirror::{FileSyncOutcome, SyncStats};
