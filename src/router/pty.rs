//! Pseudo-terminal execution for interactive commands
//!
//! The child gets its own PTY sized like the controlling terminal. For the
//! lifetime of the child three helper threads run: stdin into the PTY, PTY
//! output to stdout, and a resize watcher. All three are stopped and joined
//! before `run` returns, and raw mode is restored on every path.

use anyhow::{Context, Result};
use crossterm::terminal;
use log::{debug, warn};
use portable_pty::{CommandBuilder, MasterPty, PtySize, native_pty_system};
use std::io::{self, IsTerminal, Read, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use crate::error::GadbError;
use crate::platform;

const STDIN_POLL: Duration = Duration::from_millis(100);
const RESIZE_POLL: Duration = Duration::from_millis(250);
// At least std's stdin buffer size, so reads bypass it and poll() sees every byte
const STDIN_CHUNK: usize = 8 * 1024;

type SharedMaster = Arc<Mutex<Box<dyn MasterPty + Send>>>;

/// Puts the controlling terminal into raw mode until dropped.
/// Does nothing when stdin is not a terminal.
pub struct RawModeGuard {
    active: bool,
}

impl RawModeGuard {
    pub fn enable() -> Result<Self> {
        if !io::stdin().is_terminal() {
            return Ok(Self { active: false });
        }
        terminal::enable_raw_mode().context("Failed to set terminal to raw mode")?;
        Ok(Self { active: true })
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        if self.active {
            if let Err(e) = terminal::disable_raw_mode() {
                warn!("Failed to restore terminal mode: {}", e);
            }
        }
    }
}

pub fn terminal_size() -> PtySize {
    let (cols, rows) = terminal::size().unwrap_or((80, 24));
    PtySize {
        rows,
        cols,
        pixel_width: 0,
        pixel_height: 0,
    }
}

pub fn run(program: &str, args: &[String]) -> Result<()> {
    let size = terminal_size();
    let pair = native_pty_system()
        .openpty(size)
        .context("Failed to start PTY")?;

    let mut cmd = CommandBuilder::new(program);
    cmd.args(args);
    if let Ok(cwd) = std::env::current_dir() {
        cmd.cwd(cwd);
    }

    // Acquired right before the child starts, released when this function unwinds
    let raw = RawModeGuard::enable()?;

    let mut child = pair
        .slave
        .spawn_command(cmd)
        .with_context(|| format!("Failed to start {} in PTY", program))?;
    // Our copy of the slave must go, or the output reader never sees EOF
    drop(pair.slave);

    let reader = pair.master.try_clone_reader().context("Failed to clone PTY reader")?;
    let writer = pair.master.take_writer().context("Failed to take PTY writer")?;
    let master: SharedMaster = Arc::new(Mutex::new(pair.master));
    let stop = Arc::new(AtomicBool::new(false));

    let input = spawn_input_forwarder(writer, Arc::clone(&stop));
    let output = spawn_output_forwarder(reader);
    let resize = spawn_resize_watcher(Arc::clone(&master), (size.rows, size.cols), Arc::clone(&stop));

    let status = child.wait();
    debug!("PTY child exited: {:?}", status);

    // Drain whatever the child wrote before it exited
    output.join().ok();
    stop.store(true, Ordering::SeqCst);
    input.join().ok();
    resize.join().ok();
    drop(master);
    drop(raw);

    let status = status.context("Failed to wait for PTY process")?;
    if !status.success() {
        return Err(GadbError::CommandFailed {
            program: program.to_string(),
            code: i32::try_from(status.exit_code()).ok(),
        }
        .into());
    }
    Ok(())
}

fn spawn_input_forwarder(mut writer: Box<dyn Write + Send>, stop: Arc<AtomicBool>) -> JoinHandle<()> {
    thread::spawn(move || {
        let mut stdin = io::stdin();
        let mut buf = vec![0u8; STDIN_CHUNK];
        while !stop.load(Ordering::SeqCst) {
            match platform::stdin_ready(STDIN_POLL) {
                Ok(true) => {}
                Ok(false) => continue,
                Err(e) => {
                    debug!("stdin poll failed: {}", e);
                    break;
                }
            }
            match stdin.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => {
                    if writer.write_all(&buf[..n]).is_err() {
                        break;
                    }
                    writer.flush().ok();
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(_) => break,
            }
        }
    })
}

fn spawn_output_forwarder(mut reader: Box<dyn Read + Send>) -> JoinHandle<()> {
    thread::spawn(move || {
        let mut stdout = io::stdout();
        let mut buf = [0u8; 4096];
        loop {
            match reader.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => {
                    if stdout.write_all(&buf[..n]).is_err() {
                        break;
                    }
                    stdout.flush().ok();
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                // EIO once the child side of the PTY is closed
                Err(_) => break,
            }
        }
    })
}

fn spawn_resize_watcher(master: SharedMaster, mut last: (u16, u16), stop: Arc<AtomicBool>) -> JoinHandle<()> {
    thread::spawn(move || {
        while !stop.load(Ordering::SeqCst) {
            thread::sleep(RESIZE_POLL);
            let size = terminal_size();
            if (size.rows, size.cols) == last {
                continue;
            }
            last = (size.rows, size.cols);
            match master.lock() {
                Ok(m) => {
                    if let Err(e) = m.resize(size) {
                        debug!("PTY resize failed: {}", e);
                    }
                }
                Err(_) => break,
            }
        }
    })
}
