//! Cooperative stop signalling
//!
//! A set-once flag shared between the caller and the supervisor thread. The
//! condvar lets the supervisor sleep a full poll tick and still wake early
//! when the flag is raised.

use std::sync::{Arc, Condvar, Mutex};
use std::time::{Duration, Instant};

/// Shared stop flag. Cloning shares the underlying flag.
///
/// Write-once from the caller's side, read-only from the supervisor's side;
/// raising an already-raised signal is harmless.
#[derive(Clone, Default)]
pub struct StopSignal {
    inner: Arc<(Mutex<bool>, Condvar)>,
}

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raise the flag and wake any waiter.
    pub fn raise(&self) {
        let (flag, condvar) = &*self.inner;
        let mut raised = flag.lock().unwrap_or_else(|e| e.into_inner());
        *raised = true;
        condvar.notify_all();
    }

    pub fn is_raised(&self) -> bool {
        let (flag, _) = &*self.inner;
        *flag.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Block until the flag is raised or `timeout` elapses.
    ///
    /// Returns `true` when the flag was raised.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let (flag, condvar) = &*self.inner;
        let deadline = Instant::now() + timeout;
        let mut raised = flag.lock().unwrap_or_else(|e| e.into_inner());
        while !*raised {
            let now = Instant::now();
            if now >= deadline {
                return false;
            }
            let (guard, _) = condvar
                .wait_timeout(raised, deadline - now)
                .unwrap_or_else(|e| e.into_inner());
            raised = guard;
        }
        true
    }
}
