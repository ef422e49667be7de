//! Supervision of the focus-event pipeline
//!
//! The on-screen keyboard overlay needs to know which application holds
//! focus. A `dbus-monitor | grep` pipeline appends the filtered events to a
//! file inside the profile; this crate owns that process's full lifecycle on
//! a dedicated thread: launch, liveness polling, and graceful-then-forced
//! termination. The supervisor never reads the pipeline's output — the
//! shell redirection handles it.

mod error;
mod signal;
mod supervisor;

pub use error::{Error, Result};
pub use signal::StopSignal;
pub use supervisor::{MonitorHandle, PipelineMonitor};
