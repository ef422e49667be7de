//! Pipeline process supervision
//!
//! State machine: Idle -> Starting -> Running -> {StoppingGraceful ->
//! Stopped} | {Crashed}. The supervisor thread owns the child handle for its
//! whole life and guarantees the child has exited before the thread returns,
//! so a caller that joins after raising the stop signal can rely on no
//! orphaned process remaining.

use std::os::unix::process::CommandExt;
use std::path::{Path, PathBuf};
use std::process::{Child, Command};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use nix::sys::signal::{Signal, killpg};
use nix::unistd::Pid;
use tracing::{debug, error, info, warn};

use crate::error::{Error, Result};
use crate::signal::StopSignal;

const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);
const DEFAULT_GRACE_TIMEOUT: Duration = Duration::from_secs(5);
const SHUTDOWN_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Where the pipeline appends filtered focus events, relative to the profile.
const FOCUS_OUTPUT_RELATIVE: &str = "chrome/JS/osk_overlay_config.js";

/// Configuration for one supervised pipeline.
pub struct PipelineMonitor {
    command: String,
    prerequisite_dir: PathBuf,
    poll_interval: Duration,
    grace_timeout: Duration,
}

impl PipelineMonitor {
    /// Monitor for the production focus-event bridge.
    ///
    /// The pipeline itself filters and appends its output; the supervisor
    /// only tracks liveness.
    pub fn focus_monitor(profile_root: &Path) -> Self {
        let output = profile_root.join(FOCUS_OUTPUT_RELATIVE);
        let prerequisite_dir = output
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| profile_root.to_path_buf());
        let command = format!(
            r#"dbus-monitor | grep --line-buffered -i "com.canonical.Unity.FocusInfo.*isPidFocused" >> {}"#,
            output.display()
        );
        Self::new(command, prerequisite_dir)
    }

    /// Monitor for an arbitrary shell pipeline.
    ///
    /// `prerequisite_dir` must exist before supervision starts; its absence
    /// is the expected first-run state, not an error.
    pub fn new(command: impl Into<String>, prerequisite_dir: impl Into<PathBuf>) -> Self {
        Self {
            command: command.into(),
            prerequisite_dir: prerequisite_dir.into(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            grace_timeout: DEFAULT_GRACE_TIMEOUT,
        }
    }

    /// Override the liveness tick and the graceful shutdown bound.
    pub fn with_intervals(mut self, poll_interval: Duration, grace_timeout: Duration) -> Self {
        self.poll_interval = poll_interval;
        self.grace_timeout = grace_timeout;
        self
    }

    /// Start supervising on a background thread.
    ///
    /// Returns `Ok(None)` without creating a thread when the prerequisite
    /// directory does not exist yet. The pipeline launch itself happens on
    /// the supervisor thread; `spawn` returns immediately.
    ///
    /// # Errors
    ///
    /// Only OS-level thread creation failure is an error here.
    pub fn spawn(self) -> Result<Option<MonitorHandle>> {
        if !self.prerequisite_dir.is_dir() {
            info!(
                path = %self.prerequisite_dir.display(),
                "prerequisite directory missing, monitor not started"
            );
            return Ok(None);
        }

        let signal = StopSignal::new();
        let thread_signal = signal.clone();
        let thread = thread::Builder::new()
            .name("pipeline-monitor".into())
            .spawn(move || supervise(self, thread_signal))
            .map_err(|source| Error::ThreadSpawn { source })?;

        Ok(Some(MonitorHandle { thread, signal }))
    }
}

/// Handle to a running supervisor thread.
///
/// Stopping is an explicit two-step sequence: raise the stop signal, then
/// join. Only after `join` returns is the supervised process guaranteed to
/// have exited.
pub struct MonitorHandle {
    thread: JoinHandle<()>,
    signal: StopSignal,
}

impl MonitorHandle {
    /// The stop flag shared with the supervisor thread.
    pub fn stop_signal(&self) -> StopSignal {
        self.signal.clone()
    }

    /// Raise the stop flag without waiting. The supervisor observes it
    /// within one poll tick.
    pub fn stop(&self) {
        self.signal.raise();
    }

    /// True once the supervisor thread has finished.
    pub fn is_finished(&self) -> bool {
        self.thread.is_finished()
    }

    /// Wait for the supervisor thread to finish.
    pub fn join(self) {
        if self.thread.join().is_err() {
            error!("pipeline monitor thread panicked");
        }
    }

    /// Raise the stop flag and wait for the supervisor to finish.
    pub fn shutdown(self) {
        self.signal.raise();
        self.join();
    }
}

/// Thread body: launch, poll, and always run the two-phase shutdown.
fn supervise(monitor: PipelineMonitor, stop: StopSignal) {
    let mut child = match launch(&monitor.command) {
        Ok(child) => child,
        Err(e) => {
            // Typically sh or a pipeline binary missing from PATH. Nothing
            // to supervise; end the thread cleanly.
            error!(command = %monitor.command, error = %e, "failed to launch pipeline");
            return;
        }
    };
    info!(pid = child.id(), "pipeline launched");

    loop {
        if stop.is_raised() {
            debug!("stop requested");
            break;
        }
        match child.try_wait() {
            Ok(Some(status)) => {
                warn!(%status, "pipeline exited on its own");
                break;
            }
            Ok(None) => {}
            Err(e) => {
                warn!(error = %e, "could not poll pipeline status");
                break;
            }
        }
        stop.wait_timeout(monitor.poll_interval);
    }

    shutdown(&mut child, monitor.grace_timeout);
    debug!("pipeline monitor finished");
}

fn launch(command: &str) -> std::io::Result<Child> {
    // The pipeline runs in its own process group so a single signal reaches
    // every stage, not just the shell.
    Command::new("sh")
        .arg("-c")
        .arg(command)
        .process_group(0)
        .spawn()
}

/// Graceful-then-forced termination, always followed by a final wait.
///
/// Never returns while the child is still alive, and never blocks past the
/// grace timeout waiting for a child that ignores SIGTERM.
fn shutdown(child: &mut Child, grace_timeout: Duration) {
    match child.try_wait() {
        Ok(Some(_)) => return,
        Ok(None) => {}
        Err(e) => warn!(error = %e, "could not poll pipeline before shutdown"),
    }

    let group = Pid::from_raw(child.id() as i32);
    info!(pid = child.id(), "terminating pipeline");
    if let Err(e) = killpg(group, Signal::SIGTERM) {
        warn!(error = %e, "SIGTERM delivery failed");
    }

    let deadline = Instant::now() + grace_timeout;
    while Instant::now() < deadline {
        match child.try_wait() {
            Ok(Some(status)) => {
                debug!(%status, "pipeline terminated gracefully");
                return;
            }
            Ok(None) => thread::sleep(SHUTDOWN_POLL_INTERVAL),
            Err(e) => {
                warn!(error = %e, "could not poll pipeline during shutdown");
                break;
            }
        }
    }

    warn!("pipeline ignored SIGTERM, force killing");
    if let Err(e) = killpg(group, Signal::SIGKILL) {
        warn!(error = %e, "SIGKILL delivery failed");
    }
    match child.wait() {
        Ok(status) => debug!(%status, "pipeline force killed"),
        Err(e) => warn!(error = %e, "wait after force kill failed"),
    }
}
