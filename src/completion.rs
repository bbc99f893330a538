//! Tab completion for the interactive prompts
//!
//! Completion is a prefix match of the word under the cursor against fixed
//! keyword tables, chosen by the words already typed before it.

use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Helper};

pub const REPL_BUILTINS: &[&str] = &["help", "exit", "quit", ":sh"];

pub const ADB_COMMANDS: &[&str] = &[
    "devices", "shell", "logcat", "install", "install-multiple", "uninstall",
    "push", "pull", "sync", "reboot", "root", "unroot", "remount",
    "forward", "reverse", "bugreport", "sideload", "tcpip", "usb",
    "connect", "disconnect", "get-state", "get-serialno", "get-devpath",
    "wait-for-device", "emu", "version", "jdwp", "disable-verity", "enable-verity",
    "backup", "restore",
];

pub const SHELL_COMMANDS: &[&str] = &[
    "pm", "am", "dumpsys",
    "ps", "top", "getprop", "setprop",
    "wm", "input", "screencap", "screenrecord",
    "ls", "cd", "pwd", "cat", "grep", "rm", "mv", "cp", "mkdir", "mount", "umount",
    "netstat", "ping", "ifconfig", "ip", "route", "netcfg",
    "su", "id", "whoami", "date", "uptime", "sleep", "dmesg",
    "lsmod", "insmod", "rmmod", "kill", "killall",
    "chmod", "chown", "ln", "df", "du", "free", "uname",
    "settings", "service", "logcat",
];

pub const PM_COMMANDS: &[&str] = &[
    "list", "path", "dump", "install", "uninstall", "clear", "enable", "disable",
    "disable-user", "grant", "revoke", "hide", "unhide", "suspend", "unsuspend",
    "default-state", "reset-permissions", "set-install-location", "get-install-location",
    "trim-caches", "create-user", "remove-user", "list-users", "get-max-users",
];

pub const AM_COMMANDS: &[&str] = &[
    "start", "start-activity", "startservice", "stopservice", "broadcast",
    "force-stop", "kill", "kill-all", "instrument", "profile", "dumpheap",
    "set-debug-app", "clear-debug-app", "monitor", "screen-compat",
    "to-uri", "to-intent-uri", "stack", "task", "get-config",
];

pub const DUMPSYS_SERVICES: &[&str] = &[
    "activity", "package", "window", "meminfo", "cpuinfo", "battery", "batterystats",
    "power", "alarm", "wifi", "connectivity", "netstats", "input", "display",
    "SurfaceFlinger", "gfxinfo", "procstats", "usagestats", "notification",
    "location", "audio", "media.camera", "telephony.registry", "diskstats",
    "account", "jobscheduler",
];

/// Local shell mode keywords on top of the remote commands.
pub const SHELL_MODE_BUILTINS: &[&str] = &["exit", "quit", "q", "--pty", "-i"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionMode {
    /// `[GADB] SERIAL >` prompt: adb commands, `shell` takes remote commands
    Repl,
    /// `[SERIAL] $` prompt: every line is already a remote command
    Shell,
}

fn shell_candidates(words: &[&str]) -> Vec<&'static str> {
    match words {
        [] => SHELL_COMMANDS.to_vec(),
        ["pm"] => PM_COMMANDS.to_vec(),
        ["am"] => AM_COMMANDS.to_vec(),
        ["dumpsys"] => DUMPSYS_SERVICES.to_vec(),
        _ => Vec::new(),
    }
}

/// Keywords that may follow `words` in the given mode.
pub fn candidates(mode: CompletionMode, words: &[&str]) -> Vec<&'static str> {
    match (mode, words) {
        (CompletionMode::Repl, []) => REPL_BUILTINS.iter().chain(ADB_COMMANDS).copied().collect(),
        (CompletionMode::Repl, ["shell", rest @ ..]) => shell_candidates(rest),
        (CompletionMode::Repl, _) => Vec::new(),
        (CompletionMode::Shell, []) => SHELL_COMMANDS.iter().chain(SHELL_MODE_BUILTINS).copied().collect(),
        (CompletionMode::Shell, rest) => shell_candidates(rest),
    }
}

/// Start offset of the word under the cursor and the keywords it may complete to.
pub fn complete_at(mode: CompletionMode, line: &str, pos: usize) -> (usize, Vec<&'static str>) {
    let head = &line[..pos];
    let prefix = head.rsplit(char::is_whitespace).next().unwrap_or("");
    let start = head.len() - prefix.len();
    let words: Vec<&str> = head[..start].split_whitespace().collect();

    let matches = candidates(mode, &words)
        .into_iter()
        .filter(|c| c.starts_with(prefix))
        .collect();
    (start, matches)
}

pub struct GadbHelper {
    mode: CompletionMode,
}

impl GadbHelper {
    pub fn new(mode: CompletionMode) -> Self {
        Self { mode }
    }
}

impl Completer for GadbHelper {
    type Candidate = Pair;

    fn complete(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> rustyline::Result<(usize, Vec<Pair>)> {
        let (start, matches) = complete_at(self.mode, line, pos);
        let pairs = matches
            .into_iter()
            .map(|word| Pair {
                display: word.to_string(),
                replacement: format!("{} ", word),
            })
            .collect();
        Ok((start, pairs))
    }
}

impl Hinter for GadbHelper {
    type Hint = String;
}

impl Highlighter for GadbHelper {}

impl Validator for GadbHelper {}

impl Helper for GadbHelper {}
