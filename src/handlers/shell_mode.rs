// Local shell mode: a line-edited prompt where every line is a remote shell command.
// Commands run without a PTY unless asked for with --pty / -i.
use anyhow::Result;
use colored::*;
use crate::completion::CompletionMode;
use crate::config::GadbConfig;
use crate::device::Device;
use crate::editor::{Input, LineEditor};
use crate::router::Router;

const PTY_SUFFIXES: [&str; 2] = [" --pty", " -i"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellLine {
    Empty,
    Exit,
    /// `--pty` or `-i` alone: open a full remote shell, then leave shell mode
    OpenPty,
    /// `<cmd> --pty`: this one command through a PTY
    PtyCommand(String),
    Command(String),
}

pub fn classify(line: &str) -> ShellLine {
    match line {
        "" => ShellLine::Empty,
        "exit" | "quit" | "q" => ShellLine::Exit,
        "--pty" | "-i" => ShellLine::OpenPty,
        _ => {
            let stripped = PTY_SUFFIXES.iter().find_map(|suffix| line.strip_suffix(suffix));
            match stripped {
                Some(cmd) if !cmd.trim().is_empty() => ShellLine::PtyCommand(cmd.trim().to_string()),
                _ => ShellLine::Command(line.to_string()),
            }
        }
    }
}

/// Argument vector after `-s SERIAL`. The command stays one word so the
/// device shell does its own parsing, pipes and quotes included.
pub fn shell_args(command: &str) -> Vec<String> {
    vec!["shell".to_string(), command.to_string()]
}

pub fn run(device: &Device, router: &Router, config: &GadbConfig) -> Result<()> {
    let mut editor = LineEditor::new(
        CompletionMode::Shell,
        config.shell_history_file.clone(),
        config.history_limit,
    )?;
    let prompt = format!("[{}] $ ", device.serial);

    println!();
    println!("Entering shell mode for: {}", device.to_string().cyan());
    println!("Type 'exit', 'quit', or Ctrl+D to return to GADB");
    println!("For interactive commands (top, logcat), use: --pty");
    println!();

    loop {
        let raw = match editor.read_line(&prompt)? {
            Input::Line(raw) => raw,
            Input::Interrupted => continue,
            Input::Eof => {
                println!("Exiting shell mode...");
                break;
            }
        };
        let line = raw.trim();
        editor.remember(line);

        let outcome = match classify(line) {
            ShellLine::Empty => continue,
            ShellLine::Exit => {
                println!("Exiting shell mode...");
                break;
            }
            ShellLine::OpenPty => {
                println!("Switching to PTY mode...");
                if let Err(e) = router.run_interactive(device, &["shell".to_string()]) {
                    println!("{} {:#}", "Error:".red(), e);
                }
                break;
            }
            ShellLine::PtyCommand(cmd) => {
                println!("Running in PTY mode: {}", cmd);
                router.run_interactive(device, &shell_args(&cmd))
            }
            ShellLine::Command(cmd) => router.run_direct(device, &shell_args(&cmd)),
        };
        if let Err(e) = outcome {
            println!("{} {:#}", "Error:".red(), e);
        }
    }
    Ok(())
}
