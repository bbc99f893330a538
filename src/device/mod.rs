pub mod registry;
pub mod select;

use std::fmt;

pub use registry::{AdbRegistry, DeviceSource};
pub use select::{Choice, choose_targets};

/// One reachable device as reported by a registry scan.
/// Two values describe the same device when their serials match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Device {
    pub serial: String,
    pub product: Option<String>,
    pub model: Option<String>,
    pub device: Option<String>,
}

impl Device {
    pub fn new(serial: impl Into<String>) -> Self {
        Self {
            serial: serial.into(),
            product: None,
            model: None,
            device: None,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn same_as(&self, other: &Device) -> bool {
        self.serial == other.serial
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.model {
            Some(model) => write!(f, "{} ({})", self.serial, model),
            None => write!(f, "{}", self.serial),
        }
    }
}
