use anyhow::{Context, Result, bail};
use std::path::PathBuf;
use std::process::Command;

/// The external adb executable, plus any leading arguments configured with it
/// (e.g. `adb -H 10.0.0.2 -P 5037` to reach a remote adb server).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Adb {
    program: String,
    base_args: Vec<String>,
}

impl Adb {
    pub fn new(program: impl Into<String>, base_args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            base_args,
        }
    }

    /// Builds from a command string such as `"adb -P 5038"`, split like a shell would.
    pub fn from_command_line(cmd_str: &str) -> Result<Self> {
        let mut words = shell_words::split(cmd_str)
            .with_context(|| format!("Failed to parse adb command: {}", cmd_str))?;
        if words.is_empty() {
            bail!("adb command is empty");
        }
        let program = words.remove(0);
        Ok(Self::new(program, words))
    }

    /// Resolves the program through PATH so a missing adb fails early with a clear message.
    pub fn resolve(mut self) -> Result<Self> {
        let path: PathBuf = which::which(&self.program)
            .with_context(|| format!("Cannot find '{}'. Is the Android SDK platform-tools in PATH?", self.program))?;
        self.program = path.to_string_lossy().into_owned();
        Ok(self)
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Full argument vector for a device-scoped invocation: `<base> -s SERIAL args...`
    pub fn device_args(&self, serial: &str, args: &[String]) -> Vec<String> {
        let mut full = self.base_args.clone();
        full.push("-s".to_string());
        full.push(serial.to_string());
        full.extend_from_slice(args);
        full
    }

    /// Argument vector for an invocation that targets no particular device.
    pub fn global_args(&self, args: &[&str]) -> Vec<String> {
        let mut full = self.base_args.clone();
        full.extend(args.iter().map(|a| a.to_string()));
        full
    }

    pub fn command(&self, full_args: &[String]) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(full_args);
        cmd
    }

    /// Printable form of an invocation, quoted so it can be pasted back into a shell.
    pub fn display(&self, full_args: &[String]) -> String {
        let mut words = Vec::with_capacity(full_args.len() + 1);
        words.push(self.program.as_str());
        words.extend(full_args.iter().map(String::as_str));
        shell_words::join(words)
    }
}
