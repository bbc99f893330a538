//! Unix process setup and stdin polling

use nix::errno::Errno;
use nix::poll::{PollFd, PollFlags, PollTimeout, poll};
use nix::sys::signal::{SigHandler, Signal, signal};
use std::io;
use std::os::fd::AsFd;
use std::os::unix::process::CommandExt;
use std::process::Command;
use std::time::Duration;
use crate::platform::ProcessSetup;

const FOREGROUND_SIGNALS: [Signal; 3] = [Signal::SIGINT, Signal::SIGQUIT, Signal::SIGTSTP];

/// Restores default dispositions for the job-control signals in the child.
/// Handlers reset on exec anyway, but an *ignored* signal (e.g. under nohup)
/// would otherwise stay ignored and Ctrl+C could not stop the child.
pub struct ResetSignals;

impl ProcessSetup for ResetSignals {
    fn prepare(&self, cmd: &mut Command) {
        let reset = || -> io::Result<()> {
            for sig in FOREGROUND_SIGNALS {
                // SAFETY: sigaction is async-signal-safe, fine between fork and exec
                let previous = unsafe { signal(sig, SigHandler::SigDfl) };
                previous.map_err(io::Error::from)?;
            }
            Ok(())
        };
        // SAFETY: the hook only calls async-signal-safe functions and allocates nothing
        unsafe {
            cmd.pre_exec(reset);
        }
    }

    fn name(&self) -> &'static str {
        "reset-signals"
    }
}

pub fn stdin_ready(timeout: Duration) -> io::Result<bool> {
    let stdin = io::stdin();
    let mut fds = [PollFd::new(stdin.as_fd(), PollFlags::POLLIN)];
    let millis = u16::try_from(timeout.as_millis()).unwrap_or(u16::MAX);
    match poll(&mut fds, PollTimeout::from(millis)) {
        Ok(n) => Ok(n > 0),
        Err(Errno::EINTR) => Ok(false),
        Err(e) => Err(io::Error::from(e)),
    }
}
