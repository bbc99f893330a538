use anyhow::Result;
use log::debug;
use crate::config::DEFAULT_HISTORY_LIMIT;
use crate::device::{Device, DeviceSource};
use crate::error::GadbError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Uninitialized,
    Running,
    Stopped,
}

/// Mutable state of one interactive session.
///
/// The selection is kept as an index into `devices` and re-resolved by serial
/// after every scan, so it can never point at a device from an older scan.
pub struct Session {
    devices: Vec<Device>,
    current: Option<usize>,
    history: Vec<String>,
    history_limit: usize,
    state: SessionState,
    exit_code: i32,
}

impl Default for Session {
    fn default() -> Self {
        Self::with_history_limit(DEFAULT_HISTORY_LIMIT)
    }
}

impl Session {
    pub fn with_history_limit(history_limit: usize) -> Self {
        Self {
            devices: Vec::new(),
            current: None,
            history: Vec::with_capacity(history_limit.min(DEFAULT_HISTORY_LIMIT)),
            history_limit,
            state: SessionState::Uninitialized,
            exit_code: 0,
        }
    }

    /// Enters `Running` with the first scan's result.
    pub fn start(&mut self, devices: Vec<Device>) {
        self.current = None;
        self.apply_scan(devices);
        self.state = SessionState::Running;
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == SessionState::Running
    }

    pub fn exit_code(&self) -> i32 {
        self.exit_code
    }

    pub fn stop(&mut self, code: i32) {
        self.state = SessionState::Stopped;
        self.exit_code = code;
    }

    pub fn devices(&self) -> &[Device] {
        &self.devices
    }

    pub fn current(&self) -> Option<&Device> {
        self.current.and_then(|idx| self.devices.get(idx))
    }

    pub fn require_device(&self) -> Result<&Device> {
        self.current().ok_or_else(|| GadbError::NoDeviceSelected.into())
    }

    /// Selects by zero-based index into the current device list.
    pub fn select(&mut self, index: usize) -> Result<&Device> {
        if index >= self.devices.len() {
            return Err(GadbError::InvalidDeviceIndex(index as i64).into());
        }
        self.current = Some(index);
        Ok(&self.devices[index])
    }

    /// Replaces the device list and re-resolves the selection by serial.
    ///
    /// A selected device that vanished falls back to the first one listed.
    /// With nothing selected, a lone device is picked automatically.
    pub fn apply_scan(&mut self, devices: Vec<Device>) {
        let previous = self.current().map(|d| d.serial.clone());
        self.devices = devices;

        self.current = match previous {
            _ if self.devices.is_empty() => None,
            Some(serial) => match self.devices.iter().position(|d| d.serial == serial) {
                Some(idx) => Some(idx),
                None => {
                    debug!("Selected device {} disconnected, falling back to first available", serial);
                    Some(0)
                }
            },
            None if self.devices.len() == 1 => Some(0),
            None => None,
        };
    }

    pub fn refresh(&mut self, source: &dyn DeviceSource) -> Result<()> {
        let devices = source.scan()?;
        self.apply_scan(devices);
        Ok(())
    }

    /// Appends to history, skipping empty lines and an exact repeat of the last entry.
    /// The oldest entries go once the limit is reached. Returns whether the line was kept.
    pub fn add_history(&mut self, line: &str) -> bool {
        let repeat = self.history.last().is_some_and(|last| last == line);
        if line.is_empty() || repeat || self.history_limit == 0 {
            return false;
        }
        if self.history.len() >= self.history_limit {
            let excess = self.history.len() + 1 - self.history_limit;
            self.history.drain(..excess);
        }
        self.history.push(line.to_string());
        true
    }

    #[cfg(test)]
    pub fn history(&self) -> &[String] {
        &self.history
    }

    pub fn prompt(&self) -> String {
        match self.current() {
            Some(d) => format!("[GADB] {} > ", d.serial),
            None => "[GADB] > ".to_string(),
        }
    }
}
