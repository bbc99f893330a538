use anyhow::Result;
use colored::*;
use std::io::{BufRead, Write};
use crate::device::Device;
use crate::error::GadbError;

/// Consecutive invalid entries tolerated before the menu gives up.
pub const MAX_INVALID_ENTRIES: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    /// Zero-based index into the listed devices
    One(usize),
    All,
    Quit,
}

impl Choice {
    pub fn apply(self, devices: &[Device]) -> Vec<Device> {
        match self {
            Choice::One(idx) => devices.get(idx).cloned().into_iter().collect(),
            Choice::All => devices.to_vec(),
            Choice::Quit => Vec::new(),
        }
    }
}

/// Shows the device menu and reads a choice.
///
/// Blank picks the first device, `0` or `all` picks every device, `q` quits.
/// End of input counts as quitting, and too many bad entries in a row abort.
pub fn prompt_selection<R: BufRead, W: Write>(
    devices: &[Device],
    input: &mut R,
    out: &mut W,
) -> Result<Choice> {
    writeln!(out, "Connected devices:")?;
    writeln!(out, "  [0] All devices")?;
    for (i, d) in devices.iter().enumerate() {
        writeln!(out, "  [{}] {}", i + 1, d)?;
    }
    writeln!(out, "  [q] Exit")?;

    let mut invalid = 0;
    while invalid < MAX_INVALID_ENTRIES {
        write!(out, "Select device [1]: ")?;
        out.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            writeln!(out)?;
            return Ok(Choice::Quit);
        }

        match line.trim() {
            "" => return Ok(Choice::One(0)),
            "0" | "all" => return Ok(Choice::All),
            "q" | "Q" => return Ok(Choice::Quit),
            entry => match entry.parse::<usize>() {
                Ok(n) if (1..=devices.len()).contains(&n) => return Ok(Choice::One(n - 1)),
                _ => {
                    invalid += 1;
                    writeln!(out, "{} {}, please try again", "Invalid input:".yellow(), entry)?;
                }
            },
        }
    }
    Err(GadbError::SelectionAborted(invalid).into())
}

/// Applies the selection policy: one device is used as is, none is an error,
/// several go through the menu. `None` means the user quit.
pub fn choose_targets<R: BufRead, W: Write>(
    devices: &[Device],
    input: &mut R,
    out: &mut W,
) -> Result<Option<Vec<Device>>> {
    match devices.len() {
        0 => Err(GadbError::NoDeviceFound.into()),
        1 => Ok(Some(devices.to_vec())),
        _ => match prompt_selection(devices, input, out)? {
            Choice::Quit => Ok(None),
            choice => Ok(Some(choice.apply(devices))),
        },
    }
}
