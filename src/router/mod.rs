pub mod direct;
pub mod pty;

use anyhow::{Result, bail};
use colored::*;
use log::{debug, info};
use std::process::Command;
use crate::adb::Adb;
use crate::cmdline::{Output, ParsedCommand};
use crate::device::Device;
use crate::error::GadbError;
use crate::platform::{self, ProcessSetup};
use crate::signals::ForegroundChild;

/// Commands that open a remote shell.
const SHELL_ENTRY_COMMANDS: [&str; 2] = ["shell", "sh"];

/// logcat flags that make it print once and exit instead of streaming.
const LOGCAT_ONE_SHOT_FLAGS: [&str; 6] = ["-d", "-c", "-g", "--dump", "--clear", "--buffer-size"];

/// Whether a command needs a full pseudo-terminal: a bare remote shell or a
/// streaming logcat. `shell ps` and `logcat -d` run to completion on their own.
pub fn is_interactive(args: &[String]) -> bool {
    match args.first().map(String::as_str) {
        Some(cmd) if SHELL_ENTRY_COMMANDS.contains(&cmd) => args.len() == 1,
        Some("logcat") => !args[1..]
            .iter()
            .any(|a| LOGCAT_ONE_SHOT_FLAGS.contains(&a.as_str())),
        _ => false,
    }
}

/// Turns parsed commands into adb processes on one or more devices.
pub struct Router {
    adb: Adb,
    setup: Box<dyn ProcessSetup>,
    use_pty: bool,
}

impl Router {
    pub fn new(adb: Adb) -> Self {
        let setup = platform::process_setup();
        debug!("Process setup: {}", setup.name());
        Self {
            adb,
            setup,
            use_pty: platform::supports_pty(),
        }
    }

    /// Runs the command on each device in order, stopping at the first failure.
    pub fn run(&self, devices: &[Device], parsed: &ParsedCommand) -> Result<()> {
        for device in devices {
            if devices.len() > 1 {
                println!("{} {}", "==>".green().bold(), device.to_string().bold());
            }
            self.run_on(device, parsed)?;
        }
        Ok(())
    }

    pub fn run_on(&self, device: &Device, parsed: &ParsedCommand) -> Result<()> {
        if parsed.args.is_empty() {
            bail!(GadbError::EmptyCommand);
        }
        let interactive = is_interactive(&parsed.args);
        let full_args = self.adb.device_args(&device.serial, &parsed.args);
        info!("{} {}", "::".blue(), self.adb.display(&full_args));
        debug!(
            "Dispatch on {}: interactive={} redirect={:?} pipe={:?}",
            device.serial,
            interactive,
            parsed.redirect_mode(),
            parsed.continuation()
        );

        let _fg = ForegroundChild::enter();
        match &parsed.output {
            Output::Terminal if interactive && self.use_pty => {
                pty::run(self.adb.program(), &full_args)
            }
            Output::Terminal => direct::run_inherited(self.command(&full_args)),
            Output::File { target, mode } => {
                direct::run_to_file(self.command(&full_args), target, *mode, interactive)
            }
            Output::Pipe(continuation) => {
                if continuation.is_empty() {
                    bail!("Missing command after '|'");
                }
                let next = self.continuation_command(continuation);
                if interactive {
                    direct::run_captured_into(self.command(&full_args), next)
                } else {
                    direct::run_piped(self.command(&full_args), next)
                }
            }
        }
    }

    /// Runs `adb -s SERIAL args...` with inherited streams, whatever the command is.
    pub fn run_direct(&self, device: &Device, args: &[String]) -> Result<()> {
        let full_args = self.adb.device_args(&device.serial, args);
        info!("{} {}", "::".blue(), self.adb.display(&full_args));
        let _fg = ForegroundChild::enter();
        direct::run_inherited(self.command(&full_args))
    }

    /// Runs `adb -s SERIAL args...` through a pseudo-terminal when the platform allows.
    pub fn run_interactive(&self, device: &Device, args: &[String]) -> Result<()> {
        if !self.use_pty {
            return self.run_direct(device, args);
        }
        let full_args = self.adb.device_args(&device.serial, args);
        info!("{} {}", "::".blue(), self.adb.display(&full_args));
        let _fg = ForegroundChild::enter();
        pty::run(self.adb.program(), &full_args)
    }

    fn command(&self, full_args: &[String]) -> Command {
        let mut cmd = self.adb.command(full_args);
        self.setup.prepare(&mut cmd);
        cmd
    }

    fn continuation_command(&self, argv: &[String]) -> Command {
        let mut cmd = Command::new(&argv[0]);
        cmd.args(&argv[1..]);
        self.setup.prepare(&mut cmd);
        cmd
    }
}
