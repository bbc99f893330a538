#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectMode {
    Overwrite, // >
    Append,    // >>
}

/// Where the base command's standard output goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Output {
    // Controlling terminal: "logcat -d"
    Terminal,
    // Redirection: "logcat -d > log.txt"
    File {
        target: String,
        mode: RedirectMode,
    },
    // Pipeline: "shell ps | grep com.android"
    Pipe(Vec<String>),
}

/// One input line, split into the adb arguments and where their output goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommand {
    pub args: Vec<String>,
    pub output: Output,
}

impl ParsedCommand {
    pub fn simple(args: Vec<String>) -> Self {
        Self {
            args,
            output: Output::Terminal,
        }
    }

    pub fn redirected(args: Vec<String>, target: String, mode: RedirectMode) -> Self {
        Self {
            args,
            output: Output::File { target, mode },
        }
    }

    pub fn piped(args: Vec<String>, continuation: Vec<String>) -> Self {
        Self {
            args,
            output: Output::Pipe(continuation),
        }
    }

    pub fn redirect_mode(&self) -> Option<RedirectMode> {
        match &self.output {
            Output::File { mode, .. } => Some(*mode),
            _ => None,
        }
    }

    pub fn continuation(&self) -> Option<&[String]> {
        match &self.output {
            Output::Pipe(cmd) => Some(cmd),
            _ => None,
        }
    }
}
