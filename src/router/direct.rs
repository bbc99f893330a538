// Plain (non-PTY) process execution: inherited streams, file redirection and pipelines
use anyhow::{Context, Result};
use log::{debug, warn};
use std::fs::{File, OpenOptions};
use std::io::{Read, Write};
use std::process::{Command, ExitStatus, Stdio};
use std::thread;
use os_pipe::pipe;
use crate::cmdline::RedirectMode;
use crate::error::GadbError;

pub fn program_name(cmd: &Command) -> String {
    cmd.get_program().to_string_lossy().into_owned()
}

pub fn ensure_success(program: &str, status: ExitStatus) -> Result<()> {
    if status.success() {
        return Ok(());
    }
    Err(GadbError::CommandFailed {
        program: program.to_string(),
        code: status.code(),
    }
    .into())
}

/// stdin, stdout and stderr all stay on the controlling terminal.
pub fn run_inherited(mut cmd: Command) -> Result<()> {
    let program = program_name(&cmd);
    let status = cmd
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .with_context(|| format!("Failed to execute command: {}", program))?;
    ensure_success(&program, status)
}

pub fn open_target(target: &str, mode: RedirectMode) -> Result<File> {
    let mut open_opts = OpenOptions::new();
    match mode {
        RedirectMode::Overwrite => { open_opts.write(true).create(true).truncate(true); },
        RedirectMode::Append => { open_opts.write(true).create(true).append(true); },
    };
    open_opts
        .open(target)
        .with_context(|| format!("Failed to open output file: {}", target))
}

/// stdout goes to the file. Interactive commands lose their terminal here and
/// send stderr to the file as well; other commands keep stderr on the console.
pub fn run_to_file(mut cmd: Command, target: &str, mode: RedirectMode, interactive: bool) -> Result<()> {
    let program = program_name(&cmd);
    let file = open_target(target, mode)?;

    let stderr = if interactive {
        Stdio::from(file.try_clone().context("Failed to duplicate output file handle")?)
    } else {
        Stdio::inherit()
    };

    let status = cmd
        .stdin(Stdio::inherit())
        .stdout(file)
        .stderr(stderr)
        .status()
        .with_context(|| format!("Failed to execute command: {}", program))?;
    ensure_success(&program, status)
}

/// `base | next` over an OS pipe. The continuation runs to completion before the
/// base is awaited; a failing base is still reported afterwards.
pub fn run_piped(mut base: Command, mut next: Command) -> Result<()> {
    let base_name = program_name(&base);
    let next_name = program_name(&next);

    let (reader, writer) = pipe().context("Failed to create pipe")?;
    base.stdin(Stdio::inherit()).stdout(writer).stderr(Stdio::inherit());
    let mut base_child = base
        .spawn()
        .with_context(|| format!("Failed to start command: {}", base_name))?;
    // The Command still holds the write end; the reader only sees EOF once it is gone
    drop(base);

    let next_child = next
        .stdin(reader)
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn();
    // Same for the read end: while we hold it, a base writing past the pipe
    // buffer never sees EPIPE once the continuation is gone
    drop(next);
    let next_status = next_child
        .and_then(|mut child| child.wait())
        .with_context(|| format!("Failed to run piped command: {}", next_name));

    let base_status = base_child
        .wait()
        .with_context(|| format!("Failed to wait for command: {}", base_name))?;

    ensure_success(&next_name, next_status?)?;
    ensure_success(&base_name, base_status)
}

/// Runs the base to completion with stdout and stderr captured into memory, then
/// feeds the capture to `next`. A failing base is logged and otherwise ignored.
pub fn run_captured_into(mut base: Command, mut next: Command) -> Result<()> {
    let base_name = program_name(&base);
    let next_name = program_name(&next);

    let captured = match capture_combined(&mut base) {
        Ok((output, status)) => {
            if !status.success() {
                debug!("'{}' exited with {} while feeding a pipeline, continuing", base_name, status);
            }
            output
        }
        Err(e) => {
            warn!("'{}' failed while feeding a pipeline: {:#}", base_name, e);
            Vec::new()
        }
    };
    drop(base);

    let mut child = next
        .stdin(Stdio::piped())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()
        .with_context(|| format!("Failed to run piped command: {}", next_name))?;

    // Feed from a separate thread so a large capture cannot deadlock against the child's output
    let feeder = child.stdin.take().map(|mut child_in| {
        thread::spawn(move || {
            child_in.write_all(&captured).ok();
        })
    });

    let status = child
        .wait()
        .with_context(|| format!("Failed to wait for command: {}", next_name))?;
    if let Some(handle) = feeder {
        handle.join().ok();
    }
    ensure_success(&next_name, status)
}

fn capture_combined(cmd: &mut Command) -> Result<(Vec<u8>, ExitStatus)> {
    let (mut reader, writer) = pipe().context("Failed to create capture pipe")?;
    let writer_err = writer.try_clone().context("Failed to clone pipe writer")?;
    cmd.stdin(Stdio::inherit()).stdout(writer).stderr(writer_err);

    let mut child = cmd.spawn().context("Failed to start command")?;
    // Release our copies of the write end (held by the Command) before reading to EOF
    cmd.stdout(Stdio::null()).stderr(Stdio::null());

    let mut output = Vec::new();
    reader.read_to_end(&mut output).context("Failed to read command output")?;
    let status = child.wait()?;
    Ok((output, status))
}
