use thiserror::Error;

/// Failures callers need to tell apart. Everything else travels as a plain `anyhow::Error`.
#[derive(Debug, Error)]
pub enum GadbError {
    #[error("No device found")]
    NoDeviceFound,

    #[error("No device selected. Switch to one with its number first.")]
    NoDeviceSelected,

    #[error("Invalid device index: {0}")]
    InvalidDeviceIndex(i64),

    #[error("Device selection aborted after {0} invalid entries")]
    SelectionAborted(usize),

    #[error("Device scan timed out after {0}s")]
    ScanTimedOut(u64),

    #[error("Nothing to run")]
    EmptyCommand,

    #[error("`{program}` exited with {}", describe_code(.code))]
    CommandFailed { program: String, code: Option<i32> },
}

impl GadbError {
    /// Process exit status to report when this error ends a one-shot invocation.
    pub fn exit_code(&self) -> i32 {
        match self {
            GadbError::CommandFailed { code: Some(code), .. } if *code != 0 => *code,
            _ => 1,
        }
    }
}

fn describe_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {}", code),
        None => "no exit code (terminated by signal)".to_string(),
    }
}

/// Maps any error to the status `main` should exit with.
pub fn exit_code_for(err: &anyhow::Error) -> i32 {
    err.downcast_ref::<GadbError>()
        .map(GadbError::exit_code)
        .unwrap_or(1)
}
