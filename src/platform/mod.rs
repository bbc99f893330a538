//! Platform abstraction layer
//!
//! Hides the per-OS differences in how child processes are prepared and in
//! what the pseudo-terminal path can rely on.

#[cfg(unix)]
mod unix;

use std::io;
use std::process::Command;
use std::time::Duration;

/// Prepares a child process so terminal signals reach it correctly.
pub trait ProcessSetup: Send + Sync {
    fn prepare(&self, cmd: &mut Command);

    fn name(&self) -> &'static str;
}

/// Leaves the child exactly as the standard library spawns it.
#[cfg_attr(unix, allow(dead_code))]
pub struct InheritSetup;

impl ProcessSetup for InheritSetup {
    fn prepare(&self, _cmd: &mut Command) {}

    fn name(&self) -> &'static str {
        "inherit"
    }
}

/// Picks the process setup for the platform we were built for.
pub fn process_setup() -> Box<dyn ProcessSetup> {
    #[cfg(unix)]
    {
        Box::new(unix::ResetSignals)
    }

    #[cfg(not(unix))]
    {
        Box::new(InheritSetup)
    }
}

/// Whether interactive commands can run inside a pseudo-terminal here.
/// Elsewhere they fall back to plain inherited streams.
pub fn supports_pty() -> bool {
    cfg!(unix)
}

/// Waits up to `timeout` for stdin to become readable.
/// Returns `Ok(false)` on timeout so callers can re-check a stop flag.
pub fn stdin_ready(timeout: Duration) -> io::Result<bool> {
    #[cfg(unix)]
    {
        unix::stdin_ready(timeout)
    }

    #[cfg(not(unix))]
    {
        let _ = timeout;
        Ok(true)
    }
}
