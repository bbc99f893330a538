use anyhow::Result;
use colored::*;
use crate::device::{Device, DeviceSource};
use crate::utils::format_device_list;

pub fn print_device_list(devices: &[Device], current: Option<&Device>) {
    if devices.is_empty() {
        println!("{}", "No device found".yellow());
        return;
    }
    println!("Connected devices:");
    print!("{}", format_device_list(devices, current));
}

/// `gadb devices`: scan and print, nothing else.
pub fn handle_devices(source: &dyn DeviceSource) -> Result<i32> {
    let devices = source.scan()?;
    print_device_list(&devices, None);
    Ok(0)
}
