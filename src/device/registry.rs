use anyhow::{Context, Result, anyhow, bail};
use log::debug;
use std::io::Read;
use std::process::Stdio;
use std::thread;
use std::time::Duration;
use wait_timeout::ChildExt;
use crate::adb::Adb;
use crate::device::Device;
use crate::error::GadbError;

/// Anything that can list the currently reachable devices.
pub trait DeviceSource {
    fn scan(&self) -> Result<Vec<Device>>;
}

/// Lists devices by running `adb devices -l`.
pub struct AdbRegistry {
    adb: Adb,
    timeout: Duration,
}

impl AdbRegistry {
    pub fn new(adb: Adb, timeout: Duration) -> Self {
        Self { adb, timeout }
    }
}

impl DeviceSource for AdbRegistry {
    fn scan(&self) -> Result<Vec<Device>> {
        let args = self.adb.global_args(&["devices", "-l"]);
        let mut child = self
            .adb
            .command(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .with_context(|| format!("Failed to run: {}", self.adb.display(&args)))?;

        // Drain stdout while waiting so a chatty adb never blocks on a full pipe
        let mut stdout = child.stdout.take().context("adb stdout was not captured")?;
        let reader = thread::spawn(move || {
            let mut text = String::new();
            stdout.read_to_string(&mut text).map(|_| text)
        });

        let status = match child.wait_timeout(self.timeout)? {
            Some(status) => status,
            None => {
                child.kill().ok();
                child.wait().ok();
                bail!(GadbError::ScanTimedOut(self.timeout.as_secs()));
            }
        };

        let text = reader
            .join()
            .map_err(|_| anyhow!("Device list reader panicked"))?
            .context("Failed to read device list")?;

        if !status.success() {
            bail!("'{}' failed: {}", self.adb.display(&args), status);
        }

        let devices = parse_device_table(&text);
        debug!("Scanned {} device(s): {:?}", devices.len(), devices);
        Ok(devices)
    }
}

/// Parses the table printed by `adb devices -l`.
///
/// Skips the header, daemon start-up chatter, blank lines, offline devices
/// and any row too short to carry a serial and a state.
pub fn parse_device_table(text: &str) -> Vec<Device> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter(|line| !line.starts_with("List of devices") && !line.starts_with('*'))
        .filter_map(parse_device_row)
        .collect()
}

fn parse_device_row(line: &str) -> Option<Device> {
    let mut fields = line.split_whitespace();
    let (serial, state) = match (fields.next(), fields.next()) {
        (Some(serial), Some(state)) => (serial, state),
        _ => {
            debug!("Skipping unparsable device row: {:?}", line);
            return None;
        }
    };
    if state == "offline" {
        debug!("Skipping offline device {}", serial);
        return None;
    }

    let mut device = Device::new(serial);
    // Remaining columns are "key:value" pairs; any of them may be missing
    for field in fields {
        match field.split_once(':') {
            Some(("product", v)) if !v.is_empty() => device.product = Some(v.to_string()),
            Some(("model", v)) if !v.is_empty() => device.model = Some(v.to_string()),
            Some(("device", v)) if !v.is_empty() => device.device = Some(v.to_string()),
            _ => {}
        }
    }
    Some(device)
}
